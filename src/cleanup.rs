//! 项目清理模块
//!
//! 删除选定的项目子目录，或删除整个项目目录。
//! 只有存在配置文件的目录才会被当作项目整体删除。

// 标准库导入
use std::fs;
use std::path::PathBuf;

// 第三方crate导入
use tracing::{debug, info};

// 本地模块导入
use crate::config::{CleanupArgs, ProjectLayout};
use crate::error::{file_error, Result};

/// 需要清理的目录
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupSelection {
    pub staging: bool,
    pub templates: bool,
    pub translations: bool,
    pub output: bool,
    pub all: bool,
}

impl CleanupSelection {
    pub fn is_empty(&self) -> bool {
        !(self.staging || self.templates || self.translations || self.output || self.all)
    }
}

impl From<&CleanupArgs> for CleanupSelection {
    fn from(args: &CleanupArgs) -> Self {
        Self {
            staging: args.staging,
            templates: args.templates,
            translations: args.translations,
            output: args.output,
            all: args.all,
        }
    }
}

/// 执行清理，返回已删除的路径
pub fn cleanup_project(layout: &ProjectLayout, selection: CleanupSelection) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();

    if selection.is_empty() {
        info!("未选择任何需要清理的目录");
        return Ok(removed);
    }

    if selection.all {
        let project_dir = layout.project_dir().to_path_buf();
        if !layout.config_path().exists() {
            info!(
                "未找到配置文件，拒绝删除非项目目录: {}",
                project_dir.display()
            );
            return Ok(removed);
        }
        fs::remove_dir_all(&project_dir).map_err(file_error(&project_dir, "删除"))?;
        info!("🗑️  已删除项目目录: {}", project_dir.display());
        removed.push(project_dir);
        return Ok(removed);
    }

    let candidates = [
        (selection.staging, layout.staging_dir()),
        (selection.templates, layout.templates_dir()),
        (selection.translations, layout.translations_dir()),
        (selection.output, layout.output_dir()),
    ];

    for (selected, dir) in candidates {
        if !selected {
            continue;
        }
        if !dir.exists() {
            debug!("目录不存在，跳过: {}", dir.display());
            continue;
        }
        fs::remove_dir_all(&dir).map_err(file_error(&dir, "删除"))?;
        info!("🗑️  已删除: {}", dir.display());
        removed.push(dir);
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use tempfile::TempDir;

    fn project(dir: &TempDir) -> ProjectLayout {
        let layout = ProjectLayout::new(dir.path().join("docs"));
        for sub in [layout.staging_dir(), layout.templates_dir(), layout.output_dir()] {
            fs::create_dir_all(sub).unwrap();
        }
        layout
    }

    #[test]
    fn test_remove_selected_directories() {
        let dir = TempDir::new().unwrap();
        let layout = project(&dir);
        let selection = CleanupSelection {
            staging: true,
            translations: true,
            ..Default::default()
        };

        let removed = cleanup_project(&layout, selection).unwrap();

        assert_eq!(removed, vec![layout.staging_dir()]);
        assert!(!layout.staging_dir().exists());
        assert!(layout.templates_dir().exists());
    }

    #[test]
    fn test_all_requires_config_file() {
        let dir = TempDir::new().unwrap();
        let layout = project(&dir);
        let all = CleanupSelection {
            all: true,
            ..Default::default()
        };

        assert!(cleanup_project(&layout, all).unwrap().is_empty());
        assert!(layout.project_dir().exists());

        ProjectConfig::default().write(&layout, false).unwrap();
        assert_eq!(cleanup_project(&layout, all).unwrap().len(), 1);
        assert!(!layout.project_dir().exists());
    }

    #[test]
    fn test_empty_selection_is_noop() {
        let dir = TempDir::new().unwrap();
        let layout = project(&dir);

        assert!(cleanup_project(&layout, CleanupSelection::default()).unwrap().is_empty());
        assert!(layout.output_dir().exists());
    }
}
