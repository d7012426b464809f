// ==========================================
// 影像关联API
// ==========================================
// 职责: 打开关联会话 → 切换 → 保存回工作区
// 说明: 保存时坐标继承策略取自配置
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::types::AssociationState;
use crate::matcher::{ImageMatchSession, ImageMatcher, SaveSummary};
use crate::repository::{GcpWorkspace, SharedKvStore};
use serde::{Deserialize, Serialize};
use tracing::info;

/// GCP 组概览
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub gcp_name: String,
    pub record_count: usize,
    pub image_names: Vec<String>,
}

pub struct ImageApi {
    store: SharedKvStore,
}

impl ImageApi {
    pub fn new(store: SharedKvStore) -> Self {
        Self { store }
    }

    fn workspace(&self) -> GcpWorkspace<SharedKvStore> {
        GcpWorkspace::new(self.store.clone())
    }

    /// 当前全部 GCP 组
    pub fn list_groups(&self) -> ApiResult<Vec<GroupSummary>> {
        let groups = self.workspace().groups()?;
        Ok(groups
            .iter()
            .map(|(name, points)| GroupSummary {
                gcp_name: name.to_string(),
                record_count: points.len(),
                image_names: points.iter().filter_map(|p| p.image_name.clone()).collect(),
            })
            .collect())
    }

    /// 打开某 GCP 组的关联会话
    ///
    /// # 错误
    /// - NotFound: 工作区中没有该 GCP 组
    pub fn open_session<I, S>(&self, gcp_name: &str, image_names: I) -> ApiResult<ImageMatchSession>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let groups = self.workspace().groups()?;
        if !groups.contains(gcp_name.trim()) {
            return Err(ApiError::NotFound(format!("GCP 组不存在: {}", gcp_name.trim())));
        }
        Ok(ImageMatcher::partition(gcp_name, image_names, &groups))
    }

    /// 追加上传影像（按同一规则判定关联）
    pub fn add_images<I, S>(&self, session: &mut ImageMatchSession, image_names: I) -> ApiResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let groups = self.workspace().groups()?;
        session.add_images(image_names, &groups);
        Ok(())
    }

    pub fn toggle(&self, session: &mut ImageMatchSession, index: usize) -> ApiResult<AssociationState> {
        Ok(session.toggle(index)?)
    }

    /// 保存会话: 写回分组并将该组合并回点位列表（其他点位顺序不变）
    pub fn save(&self, session: &ImageMatchSession) -> ApiResult<SaveSummary> {
        let workspace = self.workspace();
        let policy = ConfigManager::new(self.store.clone()).get_coordinate_inheritance()?;

        let mut groups = workspace.groups()?;
        let summary = session.save(&mut groups, policy);
        let points = workspace.save_group(&groups, &summary.gcp_name)?;

        info!(
            gcp_name = %summary.gcp_name,
            total_points = points.len(),
            "工作区已按关联结果更新"
        );
        Ok(summary)
    }
}
