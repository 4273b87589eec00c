use std::sync::Arc;

use chrono::Utc;
use crates::domain::{
    entities::item_types::{InsertItemTypeEntity, UpdateItemTypeEntity},
    repositories::item_types::ItemTypeRepository,
    value_objects::{
        acks::DeletedModel,
        item_types::{CreateItemTypeModel, ItemTypeModel, UpdateItemTypeModel},
        slugs::{normalize_name, slugify},
    },
};
use tracing::{error, info};
use uuid::Uuid;

use super::{UseCaseError, UseCaseResult};

const DUPLICATE_TYPE: &str = "an item type with that name already exists";

pub struct ItemTypeUseCase<T>
where
    T: ItemTypeRepository + Send + Sync + 'static,
{
    item_type_repo: Arc<T>,
}

impl<T> ItemTypeUseCase<T>
where
    T: ItemTypeRepository + Send + Sync + 'static,
{
    pub fn new(item_type_repo: Arc<T>) -> Self {
        Self { item_type_repo }
    }

    pub async fn create(
        &self,
        created_by: Uuid,
        model: CreateItemTypeModel,
    ) -> UseCaseResult<ItemTypeModel> {
        let (name, slug) = name_and_slug(&model.name)?;

        if self
            .item_type_repo
            .exists_by_name_or_slug(&name, &slug, None)
            .await?
        {
            return Err(UseCaseError::Conflict(DUPLICATE_TYPE.to_string()));
        }

        let item_type = self
            .item_type_repo
            .create(InsertItemTypeEntity {
                name,
                slug,
                created_by,
            })
            .await
            .map_err(|err| {
                error!(db_error = ?err, "item_types: failed to create type");
                UseCaseError::from_write(err, DUPLICATE_TYPE)
            })?;

        info!(type_id = %item_type.id, slug = %item_type.slug, "item_types: type created");

        Ok(item_type.into())
    }

    pub async fn list(&self) -> UseCaseResult<Vec<ItemTypeModel>> {
        let types = self.item_type_repo.list().await?;
        Ok(types.into_iter().map(ItemTypeModel::from).collect())
    }

    pub async fn get(&self, type_id: Uuid) -> UseCaseResult<ItemTypeModel> {
        self.item_type_repo
            .find_by_id(type_id)
            .await?
            .map(ItemTypeModel::from)
            .ok_or_else(|| UseCaseError::NotFound("item type not found".to_string()))
    }

    pub async fn update(
        &self,
        type_id: Uuid,
        updated_by: Uuid,
        model: UpdateItemTypeModel,
    ) -> UseCaseResult<ItemTypeModel> {
        let raw_name = model
            .name
            .ok_or_else(|| UseCaseError::Validation("nothing to update".to_string()))?;
        let (name, slug) = name_and_slug(&raw_name)?;

        if self
            .item_type_repo
            .exists_by_name_or_slug(&name, &slug, Some(type_id))
            .await?
        {
            return Err(UseCaseError::Conflict(DUPLICATE_TYPE.to_string()));
        }

        let item_type = self
            .item_type_repo
            .update(
                type_id,
                UpdateItemTypeEntity {
                    name,
                    slug,
                    updated_by,
                    updated_at: Utc::now(),
                },
            )
            .await
            .map_err(|err| {
                error!(%type_id, db_error = ?err, "item_types: failed to update type");
                UseCaseError::from_write(err, DUPLICATE_TYPE)
            })?
            .ok_or_else(|| UseCaseError::NotFound("item type not found".to_string()))?;

        Ok(item_type.into())
    }

    pub async fn delete(&self, type_id: Uuid) -> UseCaseResult<DeletedModel> {
        let deleted = self.item_type_repo.delete(type_id).await.map_err(|err| {
            error!(%type_id, db_error = ?err, "item_types: failed to delete type");
            UseCaseError::from_write(err, "item type is still referenced")
        })?;

        if !deleted {
            return Err(UseCaseError::NotFound("item type not found".to_string()));
        }

        info!(%type_id, "item_types: type deleted");

        Ok(DeletedModel { deleted })
    }
}

/// Lowercased name and its slug. Blank names are rejected.
fn name_and_slug(raw: &str) -> UseCaseResult<(String, String)> {
    let name = normalize_name(raw).to_lowercase();
    if name.is_empty() {
        return Err(UseCaseError::Validation("name is required".to_string()));
    }
    let slug = slugify(&name);
    Ok((name, slug))
}

#[cfg(test)]
mod tests {
    use crates::domain::{
        entities::item_types::ItemTypeEntity, repositories::item_types::MockItemTypeRepository,
    };

    use super::*;

    fn entity(name: &str, slug: &str) -> ItemTypeEntity {
        let now = Utc::now();
        ItemTypeEntity {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            created_by: Uuid::new_v4(),
            updated_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn create_lowercases_name_and_derives_slug() {
        let mut repo = MockItemTypeRepository::new();
        repo.expect_exists_by_name_or_slug()
            .withf(|name, slug, exclude| {
                name == "servicios técnicos" && slug == "servicios-tecnicos" && exclude.is_none()
            })
            .returning(|_, _, _| Ok(false));
        repo.expect_create()
            .times(1)
            .returning(|insert| Ok(entity(&insert.name, &insert.slug)));

        let created = ItemTypeUseCase::new(Arc::new(repo))
            .create(
                Uuid::new_v4(),
                CreateItemTypeModel {
                    name: "  Servicios   Técnicos ".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(created.slug, "servicios-tecnicos");
    }

    #[tokio::test]
    async fn duplicate_name_is_a_conflict() {
        let mut repo = MockItemTypeRepository::new();
        repo.expect_exists_by_name_or_slug()
            .returning(|_, _, _| Ok(true));

        let result = ItemTypeUseCase::new(Arc::new(repo))
            .create(
                Uuid::new_v4(),
                CreateItemTypeModel {
                    name: "producto".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(UseCaseError::Conflict(_))));
    }

    #[tokio::test]
    async fn rename_excludes_self_from_duplicate_check() {
        let type_id = Uuid::new_v4();
        let mut repo = MockItemTypeRepository::new();
        repo.expect_exists_by_name_or_slug()
            .withf(move |_, _, exclude| *exclude == Some(type_id))
            .returning(|_, _, _| Ok(false));
        repo.expect_update()
            .withf(|_, changes| changes.slug == "insumos")
            .returning(|_, changes| Ok(Some(entity(&changes.name, &changes.slug))));

        let updated = ItemTypeUseCase::new(Arc::new(repo))
            .update(
                type_id,
                Uuid::new_v4(),
                UpdateItemTypeModel {
                    name: Some("Insumos".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "insumos");
    }

    #[tokio::test]
    async fn empty_patch_and_blank_name_are_rejected() {
        let usecase = ItemTypeUseCase::new(Arc::new(MockItemTypeRepository::new()));

        let empty = usecase
            .update(Uuid::new_v4(), Uuid::new_v4(), UpdateItemTypeModel::default())
            .await;
        assert!(matches!(empty, Err(UseCaseError::Validation(_))));

        let blank = usecase
            .create(
                Uuid::new_v4(),
                CreateItemTypeModel {
                    name: "   ".to_string(),
                },
            )
            .await;
        assert!(matches!(blank, Err(UseCaseError::Validation(_))));
    }
}
