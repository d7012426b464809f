// ==========================================
// GCP 编辑器 - 影像关联层
// ==========================================
// 职责: 上传影像 ↔ GCP 组的关联、切换与保存
// ==========================================

pub mod error;
pub mod image_matcher;

pub use error::{MatchError, MatchResult};
pub use image_matcher::{
    ImageMatchSession, ImageMatcher, ImageSelection, SaveSummary, DEFAULT_IMAGES_PER_PAGE,
};
