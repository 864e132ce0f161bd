//! Service images built from a project's Hutfile

pub mod descriptor;
pub mod flow;
pub mod manifest;

pub use descriptor::{ImageTag, ParseImageTagError, ServiceDescriptor, DEFAULT_VERSION};
pub use flow::{ServiceBuild, CONTRACT_FILE, IDL_FILE, STAGING_DIR, VENDOR_DIR};
pub use manifest::{Manifest, ManifestError, HUTFILE};
