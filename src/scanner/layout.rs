use super::FolderKind;

/// Environment variable holding the per-user local application data root.
pub const LOCAL_DATA_ENV: &str = "LOCALAPPDATA";

/// Product data directory, relative to the local application data root.
pub const PRODUCT_SUBPATH: &[&str] = &["JianyingPro", "User Data"];

/// A fixed folder under the product data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderDefinition {
    pub name: &'static str,
    pub suffix: &'static str,
    pub kind: FolderKind,
}

/// Scan order matters: ids are assigned in this order.
pub const DEFAULT_FOLDERS: [FolderDefinition; 7] = [
    FolderDefinition {
        name: "主要缓存 (Cache)",
        suffix: "Cache",
        kind: FolderKind::Cache,
    },
    FolderDefinition {
        name: "日志 (Log)",
        suffix: "Log",
        kind: FolderKind::Log,
    },
    FolderDefinition {
        name: "日志 (VELog)",
        suffix: "VELog",
        kind: FolderKind::Log,
    },
    FolderDefinition {
        name: "ByteBench",
        suffix: "ByteBench",
        kind: FolderKind::Cache,
    },
    FolderDefinition {
        name: "一起剪 (CoProduce)",
        suffix: "CoProduce",
        kind: FolderKind::Project,
    },
    FolderDefinition {
        name: "图文成片 (ArticleVideo)",
        suffix: "ArticleVideo",
        kind: FolderKind::Project,
    },
    FolderDefinition {
        name: "我的预设 (Presets)",
        suffix: "Presets",
        kind: FolderKind::Preset,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn count(kind: FolderKind) -> usize {
        DEFAULT_FOLDERS.iter().filter(|d| d.kind == kind).count()
    }

    #[test]
    fn test_category_mix() {
        assert_eq!(count(FolderKind::Cache), 2);
        assert_eq!(count(FolderKind::Log), 2);
        assert_eq!(count(FolderKind::Project), 2);
        assert_eq!(count(FolderKind::Preset), 1);
        assert_eq!(count(FolderKind::Custom), 0);
    }
}
