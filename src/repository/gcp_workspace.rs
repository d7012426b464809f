// ==========================================
// GCP 编辑器 - GCP 工作区
// ==========================================
// 职责: 在注入的 KvStore 中保存当前点位 / 分组 / CRS
// 键: gcpPoints / groupedImages / gcpCrs（JSON）
// 红线: 分组总是由点位整体重建，不做增量修补
// ==========================================

use crate::domain::gcp::{GcpPoint, GroupedIndex, ImportOutcome};
use crate::domain::types::Coordinate;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::kv_store::KvStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

/// 工作区存储键
pub mod workspace_keys {
    pub const POINTS: &str = "gcpPoints";
    pub const GROUPS: &str = "groupedImages";
    pub const CRS: &str = "gcpCrs";
}

pub struct GcpWorkspace<S: KvStore> {
    store: S,
}

impl<S: KvStore> GcpWorkspace<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read_json<T: DeserializeOwned + Default>(&self, key: &str) -> RepositoryResult<T> {
        match self.store.get(key)? {
            None => Ok(T::default()),
            Some(bytes) => {
                serde_json::from_slice(&bytes).map_err(|e| RepositoryError::SerializationError {
                    key: key.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }

    fn to_json<T: Serialize + ?Sized>(key: &str, value: &T) -> RepositoryResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| RepositoryError::SerializationError {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    // ===== 整体替换 =====

    /// 保存一次导入结果（覆盖之前的全部点位）
    ///
    /// 点位 / 分组 / CRS 作为一个批次写入
    pub fn save_import(&self, outcome: &ImportOutcome) -> RepositoryResult<()> {
        let points = Self::to_json(workspace_keys::POINTS, &outcome.points)?;
        let groups = Self::to_json(workspace_keys::GROUPS, &outcome.groups)?;
        self.store.apply_batch(&[
            (workspace_keys::POINTS, Some(points.as_slice())),
            (workspace_keys::GROUPS, Some(groups.as_slice())),
            (
                workspace_keys::CRS,
                outcome.crs.as_deref().map(str::as_bytes),
            ),
        ])?;
        info!(
            points = outcome.points.len(),
            groups = outcome.groups.len(),
            "导入结果已保存到会话"
        );
        Ok(())
    }

    /// 保存点位并由其重建分组
    pub fn save_points(&self, points: &[GcpPoint]) -> RepositoryResult<GroupedIndex> {
        let groups = GroupedIndex::from_points(points);
        let points_json = Self::to_json(workspace_keys::POINTS, points)?;
        let groups_json = Self::to_json(workspace_keys::GROUPS, &groups)?;
        self.store.apply_batch(&[
            (workspace_keys::POINTS, Some(points_json.as_slice())),
            (workspace_keys::GROUPS, Some(groups_json.as_slice())),
        ])?;
        Ok(groups)
    }

    /// 保存某组的关联结果，并将该组合并回点位列表
    ///
    /// 分组与合并后的点位作为一个批次写入
    ///
    /// # 规则
    /// - 其他组的点位位置不变
    /// - 该组不再包含的记录被移除，保留的记录留在原位置
    /// - 新记录插入到该组最后一条保留记录之后
    ///   （该组已无保留记录时插入到原第一条记录的位置，原本无记录时追加到末尾）
    pub fn save_group(&self, groups: &GroupedIndex, name: &str) -> RepositoryResult<Vec<GcpPoint>> {
        let records = groups.get(name).unwrap_or(&[]);
        let (points, added) = merge_group_records(self.points()?, name, records);

        let points_json = Self::to_json(workspace_keys::POINTS, &points)?;
        let groups_json = Self::to_json(workspace_keys::GROUPS, groups)?;
        self.store.apply_batch(&[
            (workspace_keys::POINTS, Some(points_json.as_slice())),
            (workspace_keys::GROUPS, Some(groups_json.as_slice())),
        ])?;

        debug!(
            name = %name,
            added = added,
            points = points.len(),
            "点位列表已与分组同步"
        );
        Ok(points)
    }

    pub fn clear(&self) -> RepositoryResult<()> {
        self.store.remove(workspace_keys::POINTS)?;
        self.store.remove(workspace_keys::GROUPS)?;
        self.store.remove(workspace_keys::CRS)?;
        Ok(())
    }

    // ===== 读取 =====

    pub fn points(&self) -> RepositoryResult<Vec<GcpPoint>> {
        self.read_json(workspace_keys::POINTS)
    }

    pub fn groups(&self) -> RepositoryResult<GroupedIndex> {
        self.read_json(workspace_keys::GROUPS)
    }

    pub fn crs(&self) -> RepositoryResult<Option<String>> {
        self.store.get_string(workspace_keys::CRS)
    }

    pub fn find_point(&self, id: &str) -> RepositoryResult<GcpPoint> {
        self.points()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "GcpPoint".to_string(),
                id: id.to_string(),
            })
    }

    // ===== 单点编辑 =====

    /// 修改单个点位并重建分组
    pub fn update_point<F>(&self, id: &str, edit: F) -> RepositoryResult<GcpPoint>
    where
        F: FnOnce(&mut GcpPoint),
    {
        let mut points = self.points()?;
        let point = points
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "GcpPoint".to_string(),
                id: id.to_string(),
            })?;
        edit(point);
        let updated = point.clone();

        self.save_points(&points)?;
        debug!(id = %id, name = %updated.name, "点位已更新");
        Ok(updated)
    }

    /// 标记拖拽结束后的新坐标
    pub fn move_point(&self, id: &str, coordinate: Coordinate) -> RepositoryResult<GcpPoint> {
        if !coordinate.is_finite() {
            return Err(RepositoryError::FieldValueError {
                field: "coordinate".to_string(),
                message: format!("坐标必须为有限数: {:?}", coordinate),
            });
        }
        self.update_point(id, |p| p.coordinate = Some(coordinate))
    }

    pub fn rename_point(&self, id: &str, name: &str) -> RepositoryResult<GcpPoint> {
        let name = name.trim().to_string();
        self.update_point(id, |p| p.name = name)
    }

    pub fn set_image_name(&self, id: &str, image_name: Option<&str>) -> RepositoryResult<GcpPoint> {
        let image_name = image_name
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);
        self.update_point(id, |p| p.image_name = image_name)
    }

    pub fn set_pixel(
        &self,
        id: &str,
        pixel_x: Option<f64>,
        pixel_y: Option<f64>,
    ) -> RepositoryResult<GcpPoint> {
        let finite = |v: Option<f64>| v.filter(|n| n.is_finite());
        self.update_point(id, |p| {
            p.pixel_x = finite(pixel_x);
            p.pixel_y = finite(pixel_y);
        })
    }
}

/// 将某组的新记录合并进点位列表，返回 (合并结果, 新增数)
fn merge_group_records(
    mut points: Vec<GcpPoint>,
    name: &str,
    records: &[GcpPoint],
) -> (Vec<GcpPoint>, usize) {
    let anchor = points.iter().position(|p| p.name == name);
    let kept_ids: HashSet<&str> = records.iter().map(|p| p.id.as_str()).collect();
    points.retain(|p| p.name != name || kept_ids.contains(p.id.as_str()));

    let present: HashSet<String> = points
        .iter()
        .filter(|p| p.name == name)
        .map(|p| p.id.clone())
        .collect();
    let added: Vec<GcpPoint> = records
        .iter()
        .filter(|p| !present.contains(&p.id))
        .cloned()
        .collect();

    let insert_at = points
        .iter()
        .rposition(|p| p.name == name)
        .map(|idx| idx + 1)
        .or(anchor)
        .unwrap_or(points.len());
    let added_count = added.len();
    points.splice(insert_at..insert_at, added);
    (points, added_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::GcpFormat;
    use crate::importer::{GcpImporter, GcpImporterImpl};
    use crate::repository::kv_store::{KvWrite, MemoryKvStore};

    fn imported_repo() -> GcpWorkspace<MemoryKvStore> {
        let repo = GcpWorkspace::new(MemoryKvStore::new());
        let outcome = GcpImporterImpl::default().import(
            "+proj=longlat\n1 2 0 10 20 a.jpg A\n3 4 0 30 40 b.jpg B",
            GcpFormat::TextWhitespace7Field,
        );
        repo.save_import(&outcome).unwrap();
        repo
    }

    #[test]
    fn test_empty_store_reads_defaults() {
        let repo = GcpWorkspace::new(MemoryKvStore::new());
        assert!(repo.points().unwrap().is_empty());
        assert!(repo.groups().unwrap().is_empty());
        assert_eq!(repo.crs().unwrap(), None);
    }

    #[test]
    fn test_save_import_round_trip() {
        let repo = imported_repo();
        assert_eq!(repo.points().unwrap().len(), 2);
        assert_eq!(repo.groups().unwrap().len(), 2);
        assert_eq!(repo.crs().unwrap().as_deref(), Some("+proj=longlat"));
    }

    #[test]
    fn test_rename_rebuilds_groups() {
        let repo = imported_repo();
        let id = repo.points().unwrap()[1].id.clone();

        let updated = repo.rename_point(&id, "  A ").unwrap();
        assert_eq!(updated.name, "A");

        let groups = repo.groups().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.get("A").map(|g| g.len()), Some(2));
    }

    #[test]
    fn test_move_point() {
        let repo = imported_repo();
        let id = repo.points().unwrap()[0].id.clone();

        let moved = repo
            .move_point(&id, Coordinate::Projected { x: 9.5, y: 8.5 })
            .unwrap();
        assert_eq!(moved.xy(), Some((9.5, 8.5)));
        assert_eq!(repo.find_point(&id).unwrap().xy(), Some((9.5, 8.5)));

        let err = repo.move_point(&id, Coordinate::Projected { x: f64::NAN, y: 0.0 });
        assert!(matches!(err, Err(RepositoryError::FieldValueError { .. })));
    }

    #[test]
    fn test_update_unknown_point() {
        let repo = imported_repo();
        assert!(matches!(
            repo.rename_point("missing", "X"),
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_set_image_name_blank_is_none() {
        let repo = imported_repo();
        let id = repo.points().unwrap()[0].id.clone();
        let updated = repo.set_image_name(&id, Some("   ")).unwrap();
        assert_eq!(updated.image_name, None);
    }

    #[test]
    fn test_new_import_replaces_crs() {
        let repo = imported_repo();
        let outcome = GcpImporterImpl::default().import("A,1,2", GcpFormat::Text3Field);
        repo.save_import(&outcome).unwrap();
        assert_eq!(repo.crs().unwrap(), None);
        assert_eq!(repo.points().unwrap().len(), 1);
    }

    #[test]
    fn test_sync_group_keeps_point_order() {
        let repo = GcpWorkspace::new(MemoryKvStore::new());
        let outcome = GcpImporterImpl::default().import(
            "1 2 0 1 1 z.jpg Zeta\n3 4 0 1 1 a.jpg Alpha\n5 6 0 1 1 m.jpg Mid\n7 8 0 1 1 y.jpg Zeta",
            GcpFormat::TextWhitespace7Field,
        );
        repo.save_import(&outcome).unwrap();

        let mut groups = repo.groups().unwrap();
        let mut zeta = groups.get("Zeta").unwrap().to_vec();
        let mut extra = zeta[0].clone();
        extra.id = GcpPoint::generate_id();
        extra.image_name = Some("new.jpg".to_string());
        zeta.remove(0);
        zeta.push(extra);
        groups.replace("Zeta", zeta);

        let points = repo.save_group(&groups, "Zeta").unwrap();
        let images: Vec<&str> = points
            .iter()
            .filter_map(|p| p.image_name.as_deref())
            .collect();
        assert_eq!(images, vec!["a.jpg", "m.jpg", "y.jpg", "new.jpg"]);
        assert_eq!(repo.points().unwrap(), points);
        assert_eq!(repo.groups().unwrap(), groups);
    }

    #[test]
    fn test_sync_removed_group_drops_points() {
        let repo = imported_repo();
        let mut groups = repo.groups().unwrap();
        groups.remove("A");

        let points = repo.save_group(&groups, "A").unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].name, "B");
        assert!(!repo.groups().unwrap().contains("A"));
    }

    /// 批量写入总是失败的存储（单键写入正常）
    struct BatchFailingStore(MemoryKvStore);

    impl KvStore for BatchFailingStore {
        fn get(&self, key: &str) -> RepositoryResult<Option<Vec<u8>>> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &[u8]) -> RepositoryResult<()> {
            self.0.set(key, value)
        }

        fn remove(&self, key: &str) -> RepositoryResult<()> {
            self.0.remove(key)
        }

        fn apply_batch(&self, _writes: &[KvWrite<'_>]) -> RepositoryResult<()> {
            Err(RepositoryError::InternalError("batch rejected".to_string()))
        }
    }

    #[test]
    fn test_failed_group_save_leaves_workspace_unchanged() {
        let outcome = GcpImporterImpl::default().import(
            "1 2 0 1 1 a.jpg A\n3 4 0 1 1 b.jpg B",
            GcpFormat::TextWhitespace7Field,
        );
        let repo = GcpWorkspace::new(BatchFailingStore(MemoryKvStore::new()));
        let points_json = serde_json::to_vec(&outcome.points).unwrap();
        let groups_json = serde_json::to_vec(&outcome.groups).unwrap();
        repo.store().set(workspace_keys::POINTS, &points_json).unwrap();
        repo.store().set(workspace_keys::GROUPS, &groups_json).unwrap();

        let mut groups = repo.groups().unwrap();
        groups.remove("A");

        assert!(matches!(
            repo.save_group(&groups, "A"),
            Err(RepositoryError::InternalError(_))
        ));
        assert_eq!(repo.groups().unwrap(), outcome.groups);
        assert_eq!(repo.points().unwrap(), outcome.points);
    }

    #[test]
    fn test_corrupt_json_is_reported() {
        let store = MemoryKvStore::new();
        store.set(workspace_keys::POINTS, b"{not json").unwrap();
        let repo = GcpWorkspace::new(store);
        assert!(matches!(
            repo.points(),
            Err(RepositoryError::SerializationError { .. })
        ));
    }
}
