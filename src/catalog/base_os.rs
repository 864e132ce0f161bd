use super::BaseOsId;

/// Package-manager semantics of a base distribution
pub trait BaseOs: Send + Sync {
    fn id(&self) -> BaseOsId;

    /// Packages installed into every image built on this base
    fn base_packages(&self) -> &[&'static str];

    /// Single package-manager invocation installing `pkgs` in order
    fn install_command(&self, pkgs: &[&str]) -> String;

    /// Cache, log and doc removal run after every install step
    fn cleanup_commands(&self) -> Vec<String>;

    /// Repository declarations that must precede the base install
    fn repository_setup(&self) -> Vec<String> {
        Vec::new()
    }

    fn name(&self) -> &'static str {
        self.id().name()
    }

    fn description(&self) -> String {
        format!("Base OS image using {}", capitalize(self.name()))
    }

    /// Install command followed by the cleanup sequence
    fn install_packages(&self, pkgs: &[&str]) -> Vec<String> {
        let mut cmds = vec![self.install_command(pkgs)];
        cmds.extend(self.cleanup_commands());
        cmds
    }

    /// Full command sequence for the base image
    fn setup_commands(&self) -> Vec<String> {
        let mut cmds = self.repository_setup();
        cmds.extend(self.install_packages(self.base_packages()));
        cmds
    }
}

pub(crate) fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct FedoraBase;

impl BaseOs for FedoraBase {
    fn id(&self) -> BaseOsId {
        BaseOsId::Fedora
    }

    fn base_packages(&self) -> &[&'static str] {
        &["python3", "python3-pip"]
    }

    fn install_command(&self, pkgs: &[&str]) -> String {
        format!("dnf -y install {}", pkgs.join(" "))
    }

    fn cleanup_commands(&self) -> Vec<String> {
        [
            "dnf -y autoremove",
            "dnf -y clean all",
            "rm -rf /usr/share/locale/*",
            "rm -rf /usr/share/doc/*",
            "journalctl --vacuum-size=0",
            "rm -rf /var/log/* || true",
            "rm -rf /var/cache/*",
            "rm -rf /tmp/*",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

pub struct AlpineBase;

const ALPINE_MIRROR: &str = "http://nl.alpinelinux.org/alpine";

impl BaseOs for AlpineBase {
    fn id(&self) -> BaseOsId {
        BaseOsId::Alpine
    }

    fn base_packages(&self) -> &[&'static str] {
        &["python3", "ca-certificates"]
    }

    fn install_command(&self, pkgs: &[&str]) -> String {
        format!("apk --update add {}", pkgs.join(" "))
    }

    fn cleanup_commands(&self) -> Vec<String> {
        [
            "rm -rf /usr/share/locale/*",
            "rm -rf /usr/share/doc/*",
            "rm -rf /var/log/* || true",
            "rm -rf /var/cache/*",
            "rm -rf /tmp/*",
            // apk expects its cache dir to exist on the next install
            "mkdir /var/cache/apk",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn repository_setup(&self) -> Vec<String> {
        [("edge", "edge/main"), ("testing", "edge/testing")]
            .iter()
            .map(|(tag, repo)| {
                format!(
                    "echo \"@{} {}/{}\" >> /etc/apk/repositories",
                    tag, ALPINE_MIRROR, repo
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fedora_install_command() {
        assert_eq!(
            FedoraBase.install_command(&["python3", "git"]),
            "dnf -y install python3 git"
        );
    }

    #[test]
    fn test_alpine_install_command() {
        assert_eq!(
            AlpineBase.install_command(&["iojs@testing"]),
            "apk --update add iojs@testing"
        );
    }

    #[test]
    fn test_install_packages_appends_cleanup() {
        let cmds = FedoraBase.install_packages(&["python3"]);
        assert_eq!(cmds[0], "dnf -y install python3");
        assert_eq!(&cmds[1..], FedoraBase.cleanup_commands().as_slice());
    }

    #[test]
    fn test_alpine_setup_declares_repositories_first() {
        let cmds = AlpineBase.setup_commands();
        assert_eq!(
            cmds[0],
            "echo \"@edge http://nl.alpinelinux.org/alpine/edge/main\" >> /etc/apk/repositories"
        );
        assert_eq!(
            cmds[1],
            "echo \"@testing http://nl.alpinelinux.org/alpine/edge/testing\" >> /etc/apk/repositories"
        );
        assert_eq!(cmds[2], "apk --update add python3 ca-certificates");
        assert_eq!(cmds.last().unwrap(), "mkdir /var/cache/apk");
    }

    #[test]
    fn test_fedora_setup_has_no_repository_preamble() {
        let cmds = FedoraBase.setup_commands();
        assert_eq!(cmds[0], "dnf -y install python3 python3-pip");
        assert_eq!(cmds.len(), 1 + FedoraBase.cleanup_commands().len());
    }

    #[test]
    fn test_description() {
        assert_eq!(FedoraBase.description(), "Base OS image using Fedora");
        assert_eq!(AlpineBase.description(), "Base OS image using Alpine");
    }
}
