// ==========================================
// GCP 编辑器 - 影像关联器
// ==========================================
// 规则:
// - 影像名出现在该 GCP 组的 imageName 中 → Associated（默认选中）
// - 否则 → Unassociated（默认未选中）
// - 切换只改变会话状态，保存时才写回分组
// - 保存: 选中影像整体替换该组记录
// ==========================================

use crate::domain::gcp::{GcpPoint, GroupedIndex};
use crate::domain::types::{AssociationState, CoordinateInheritance};
use crate::matcher::error::{MatchError, MatchResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 每页影像数
pub const DEFAULT_IMAGES_PER_PAGE: usize = 10;

// ==========================================
// ImageSelection - 单张影像的关联状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSelection {
    pub image_name: String,
    pub state: AssociationState,
}

impl ImageSelection {
    pub fn is_selected(&self) -> bool {
        self.state.is_selected()
    }
}

// ==========================================
// SaveSummary - 保存结果统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSummary {
    pub gcp_name: String,
    pub kept: usize,               // 保留原记录
    pub inherited: usize,          // 新关联，继承坐标
    pub needs_manual_entry: usize, // 新关联，缺少坐标
    pub removed: usize,            // 原记录被移除
}

impl SaveSummary {
    pub fn total(&self) -> usize {
        self.kept + self.inherited + self.needs_manual_entry
    }
}

// ==========================================
// ImageMatchSession - 单个 GCP 的关联会话
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMatchSession {
    gcp_name: String,
    images: Vec<ImageSelection>,
}

impl ImageMatchSession {
    pub fn new(gcp_name: impl Into<String>) -> Self {
        Self {
            gcp_name: gcp_name.into(),
            images: Vec::new(),
        }
    }

    pub fn gcp_name(&self) -> &str {
        &self.gcp_name
    }

    pub fn images(&self) -> &[ImageSelection] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// 追加上传影像并重新排序（已关联在前，其余保持上传顺序）
    ///
    /// 同名影像只保留第一次上传
    pub fn add_images<I, S>(&mut self, image_names: I, groups: &GroupedIndex)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let group = groups.get(&self.gcp_name).unwrap_or(&[]);

        for name in image_names {
            let name = name.as_ref().trim();
            if name.is_empty() || self.images.iter().any(|i| i.image_name == name) {
                debug!(image_name = %name, "跳过空名或重复影像");
                continue;
            }

            let associated = group
                .iter()
                .any(|p| p.image_name.as_deref() == Some(name));
            self.images.push(ImageSelection {
                image_name: name.to_string(),
                state: if associated {
                    AssociationState::Associated
                } else {
                    AssociationState::Unassociated
                },
            });
        }

        // 稳定排序
        self.images.sort_by_key(|i| !i.is_selected());
    }

    /// 切换第 index 张影像的关联状态
    pub fn toggle(&mut self, index: usize) -> MatchResult<AssociationState> {
        let len = self.images.len();
        let image = self
            .images
            .get_mut(index)
            .ok_or(MatchError::IndexOutOfRange { index, len })?;
        image.state = image.state.toggled();
        Ok(image.state)
    }

    /// 按影像名切换
    pub fn toggle_by_name(&mut self, image_name: &str) -> MatchResult<AssociationState> {
        let index = self
            .images
            .iter()
            .position(|i| i.image_name == image_name)
            .ok_or_else(|| MatchError::ImageNotFound(image_name.to_string()))?;
        self.toggle(index)
    }

    pub fn selected(&self) -> impl Iterator<Item = &ImageSelection> {
        self.images.iter().filter(|i| i.is_selected())
    }

    /// 总页数
    pub fn total_pages(&self, per_page: usize) -> usize {
        let per_page = per_page.max(1);
        self.images.len().div_ceil(per_page)
    }

    /// 第 page 页的影像（页码从 1 开始），返回 (全局起始索引, 影像切片)
    pub fn page(&self, page: usize, per_page: usize) -> (usize, &[ImageSelection]) {
        let per_page = per_page.max(1);
        let start = page.saturating_sub(1).saturating_mul(per_page).min(self.images.len());
        let end = start.saturating_add(per_page).min(self.images.len());
        (start, &self.images[start..end])
    }

    /// 保存选择: 选中影像整体替换该 GCP 组
    ///
    /// # 规则
    /// - 已有记录的影像保留原记录
    /// - 新关联影像按 policy 取默认值:
    ///   - InheritFirst: 复制组内第一条记录的坐标 / z / 像素
    ///   - ManualEntry: 不带坐标，待人工录入
    /// - 无选中影像时移除该组
    pub fn save(&self, groups: &mut GroupedIndex, policy: CoordinateInheritance) -> SaveSummary {
        let existing: Vec<GcpPoint> = groups
            .get(&self.gcp_name)
            .map(|g| g.to_vec())
            .unwrap_or_default();
        let template = existing.first();

        let mut summary = SaveSummary {
            gcp_name: self.gcp_name.clone(),
            ..SaveSummary::default()
        };
        let mut records = Vec::new();

        for selection in self.selected() {
            let own: Vec<&GcpPoint> = existing
                .iter()
                .filter(|p| p.image_name.as_deref() == Some(selection.image_name.as_str()))
                .collect();

            if !own.is_empty() {
                summary.kept += own.len();
                records.extend(own.into_iter().cloned());
                continue;
            }

            let mut point = GcpPoint::new(self.gcp_name.clone(), None);
            point.image_name = Some(selection.image_name.clone());
            if let (CoordinateInheritance::InheritFirst, Some(t)) = (policy, template) {
                point.coordinate = t.coordinate;
                point.z = t.z;
                point.pixel_x = t.pixel_x;
                point.pixel_y = t.pixel_y;
            }

            if point.needs_manual_entry() {
                summary.needs_manual_entry += 1;
            } else {
                summary.inherited += 1;
            }
            records.push(point);
        }

        summary.removed = existing.len() - summary.kept;
        groups.replace(&self.gcp_name, records);

        info!(
            gcp_name = %self.gcp_name,
            policy = %policy,
            kept = summary.kept,
            inherited = summary.inherited,
            needs_manual_entry = summary.needs_manual_entry,
            removed = summary.removed,
            "影像关联已保存"
        );

        summary
    }
}

// ==========================================
// ImageMatcher - 会话构建入口
// ==========================================
pub struct ImageMatcher;

impl ImageMatcher {
    /// 将上传影像按 GCP 组划分为已关联/未关联
    ///
    /// 名称 TRIM 后为空时对应空键分组
    pub fn partition<I, S>(gcp_name: &str, image_names: I, groups: &GroupedIndex) -> ImageMatchSession
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut session = ImageMatchSession::new(gcp_name.trim());
        session.add_images(image_names, groups);
        session
    }
}
