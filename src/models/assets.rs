use serde::{Deserialize, Serialize};

/// One emitted output file, as reported by the host's build stats.
///
/// `name` is relative to the output directory (e.g. `js/main.3f2a.js`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRecord {
    pub name: String,
}

impl AssetRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl From<&str> for AssetRecord {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Build outcome in the shape hosts commonly serialize their stats to.
///
/// Implements both [`Compilation`](crate::host::Compilation) and
/// [`BuildStats`](crate::host::BuildStats), so a host that already has JSON
/// or YAML stats can feed them to the coordinator directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    #[serde(default)]
    pub errors: Vec<String>,

    #[serde(default)]
    pub assets: Vec<AssetRecord>,
}

impl BuildReport {
    /// A successful build that emitted the given files.
    pub fn with_assets<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            errors: Vec::new(),
            assets: names.into_iter().map(AssetRecord::new).collect(),
        }
    }

    /// A failed build.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            errors: vec![error.into()],
            assets: Vec::new(),
        }
    }
}
