crate::define_id_enum! {
    /// Base operating system identifier
    BaseOsId {
        Fedora => "fedora",
        Alpine => "alpine",
    }
}

crate::define_id_enum! {
    /// Language stack identifier
    StackId {
        Python => "python" | "python3",
        NodeJs => "nodejs" | "node" | "iojs",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_with_aliases() {
        assert_eq!(BaseOsId::from_name("fedora"), Some(BaseOsId::Fedora));
        assert_eq!(BaseOsId::from_name("Alpine"), Some(BaseOsId::Alpine));
        assert_eq!(StackId::from_name("python3"), Some(StackId::Python));
        assert_eq!(StackId::from_name("node"), Some(StackId::NodeJs));
        assert_eq!(StackId::from_name("NodeJS"), Some(StackId::NodeJs));
        assert_eq!(StackId::from_name("ruby"), None);
        assert_eq!(BaseOsId::from_name("debian"), None);
    }

    #[test]
    fn test_display_is_canonical_name() {
        assert_eq!(format!("{}", BaseOsId::Fedora), "fedora");
        assert_eq!(format!("{}", StackId::NodeJs), "nodejs");
    }

    #[test]
    fn test_serde_uses_canonical_name() {
        assert_eq!(serde_json::to_string(&StackId::NodeJs).unwrap(), "\"nodejs\"");
        let parsed: BaseOsId = serde_json::from_str("\"alpine\"").unwrap();
        assert_eq!(parsed, BaseOsId::Alpine);
    }

    #[test]
    fn test_deserialize_unknown_name_fails() {
        let parsed: Result<StackId, _> = serde_json::from_str("\"cobol\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_all_variants_in_declaration_order() {
        assert_eq!(BaseOsId::all_variants(), &[BaseOsId::Fedora, BaseOsId::Alpine]);
        assert_eq!(StackId::all_variants(), &[StackId::Python, StackId::NodeJs]);
    }
}
