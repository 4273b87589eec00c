use std::sync::Arc;

use chrono::Utc;
use crates::domain::{
    entities::categories::{InsertCategoryEntity, UpdateCategoryEntity},
    repositories::{categories::CategoryRepository, item_types::ItemTypeRepository},
    value_objects::{
        acks::DeletedModel,
        categories::{CategoriesQuery, CategoryModel, CreateCategoryModel, UpdateCategoryModel},
        slugs::{normalize_name, slugify},
    },
};
use tracing::{error, info};
use uuid::Uuid;

use super::{UseCaseError, UseCaseResult};

const DUPLICATE_CATEGORY: &str = "a category with that name already exists";

pub struct CategoryUseCase<C, T>
where
    C: CategoryRepository + Send + Sync + 'static,
    T: ItemTypeRepository + Send + Sync + 'static,
{
    category_repo: Arc<C>,
    item_type_repo: Arc<T>,
}

impl<C, T> CategoryUseCase<C, T>
where
    C: CategoryRepository + Send + Sync + 'static,
    T: ItemTypeRepository + Send + Sync + 'static,
{
    pub fn new(category_repo: Arc<C>, item_type_repo: Arc<T>) -> Self {
        Self {
            category_repo,
            item_type_repo,
        }
    }

    pub async fn create(
        &self,
        created_by: Uuid,
        model: CreateCategoryModel,
    ) -> UseCaseResult<CategoryModel> {
        let name = normalize_name(&model.name);
        if name.is_empty() {
            return Err(UseCaseError::Validation("name is required".to_string()));
        }
        let slug = slugify(&name);

        self.ensure_type_exists(model.type_id).await?;

        if self.category_repo.exists_by_slug(&slug, None).await? {
            return Err(UseCaseError::Conflict(DUPLICATE_CATEGORY.to_string()));
        }

        let category = self
            .category_repo
            .create(InsertCategoryEntity {
                name,
                slug,
                type_id: model.type_id,
                created_by,
            })
            .await
            .map_err(|err| {
                error!(db_error = ?err, "categories: failed to create category");
                UseCaseError::from_write(err, DUPLICATE_CATEGORY)
            })?;

        info!(category_id = %category.id, type_id = %category.type_id, "categories: category created");

        Ok(category.into())
    }

    pub async fn list(&self, query: CategoriesQuery) -> UseCaseResult<Vec<CategoryModel>> {
        let Some(type_id) = self.resolve_type_filter(&query).await? else {
            return Ok(Vec::new());
        };

        let categories = self.category_repo.list(type_id).await?;

        Ok(categories.into_iter().map(CategoryModel::from).collect())
    }

    /// Distinct category names, optionally restricted to one type.
    pub async fn names_by_type(&self, query: CategoriesQuery) -> UseCaseResult<Vec<String>> {
        let Some(type_id) = self.resolve_type_filter(&query).await? else {
            return Ok(Vec::new());
        };

        Ok(self.category_repo.distinct_names(type_id).await?)
    }

    pub async fn get(&self, category_id: Uuid) -> UseCaseResult<CategoryModel> {
        self.category_repo
            .find_by_id(category_id)
            .await?
            .map(CategoryModel::from)
            .ok_or_else(|| UseCaseError::NotFound("category not found".to_string()))
    }

    pub async fn update(
        &self,
        category_id: Uuid,
        updated_by: Uuid,
        model: UpdateCategoryModel,
    ) -> UseCaseResult<CategoryModel> {
        if model.name.is_none() && model.type_id.is_none() {
            return Err(UseCaseError::Validation("nothing to update".to_string()));
        }

        let mut changes = UpdateCategoryEntity {
            name: None,
            slug: None,
            type_id: None,
            updated_by,
            updated_at: Utc::now(),
        };

        if let Some(raw) = model.name.as_deref() {
            let name = normalize_name(raw);
            if name.is_empty() {
                return Err(UseCaseError::Validation("name is required".to_string()));
            }
            let slug = slugify(&name);

            if self
                .category_repo
                .exists_by_slug(&slug, Some(category_id))
                .await?
            {
                return Err(UseCaseError::Conflict(DUPLICATE_CATEGORY.to_string()));
            }

            changes.name = Some(name);
            changes.slug = Some(slug);
        }

        if let Some(type_id) = model.type_id {
            self.ensure_type_exists(type_id).await?;
            changes.type_id = Some(type_id);
        }

        let category = self
            .category_repo
            .update(category_id, changes)
            .await
            .map_err(|err| {
                error!(%category_id, db_error = ?err, "categories: failed to update category");
                UseCaseError::from_write(err, DUPLICATE_CATEGORY)
            })?
            .ok_or_else(|| UseCaseError::NotFound("category not found".to_string()))?;

        Ok(category.into())
    }

    pub async fn delete(&self, category_id: Uuid) -> UseCaseResult<DeletedModel> {
        let deleted = self
            .category_repo
            .delete(category_id)
            .await
            .map_err(|err| {
                error!(%category_id, db_error = ?err, "categories: failed to delete category");
                UseCaseError::from_write(err, "category is still referenced")
            })?;

        if !deleted {
            return Err(UseCaseError::NotFound("category not found".to_string()));
        }

        info!(%category_id, "categories: category deleted");

        Ok(DeletedModel { deleted })
    }

    async fn ensure_type_exists(&self, type_id: Uuid) -> UseCaseResult<()> {
        if self.item_type_repo.find_by_id(type_id).await?.is_none() {
            return Err(UseCaseError::Validation(format!(
                "item type {type_id} does not exist"
            )));
        }
        Ok(())
    }

    /// `Some(None)` means no filter, `None` means the requested type slug is unknown.
    async fn resolve_type_filter(
        &self,
        query: &CategoriesQuery,
    ) -> UseCaseResult<Option<Option<Uuid>>> {
        if let Some(type_id) = query.type_id {
            return Ok(Some(Some(type_id)));
        }

        match query
            .type_slug
            .as_deref()
            .map(str::trim)
            .filter(|slug| !slug.is_empty())
        {
            Some(slug) => Ok(self
                .item_type_repo
                .find_by_slug(&slug.to_lowercase())
                .await?
                .map(|item_type| Some(item_type.id))),
            None => Ok(Some(None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crates::domain::{
        entities::{categories::CategoryEntity, item_types::ItemTypeEntity},
        repositories::{
            categories::MockCategoryRepository, item_types::MockItemTypeRepository,
        },
    };

    use super::*;

    fn item_type(id: Uuid, slug: &str) -> ItemTypeEntity {
        let now = Utc::now();
        ItemTypeEntity {
            id,
            name: slug.to_string(),
            slug: slug.to_string(),
            created_by: Uuid::new_v4(),
            updated_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn category(name: &str, slug: &str, type_id: Uuid) -> CategoryEntity {
        let now = Utc::now();
        CategoryEntity {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            type_id,
            created_by: Uuid::new_v4(),
            updated_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn create_requires_an_existing_type() {
        let mut types = MockItemTypeRepository::new();
        types.expect_find_by_id().returning(|_| Ok(None));

        let result = CategoryUseCase::new(Arc::new(MockCategoryRepository::new()), Arc::new(types))
            .create(
                Uuid::new_v4(),
                CreateCategoryModel {
                    name: "Cámaras".to_string(),
                    type_id: Uuid::new_v4(),
                },
            )
            .await;

        assert!(matches!(result, Err(UseCaseError::Validation(_))));
    }

    #[tokio::test]
    async fn create_derives_slug_and_rejects_duplicates() {
        let type_id = Uuid::new_v4();
        let mut types = MockItemTypeRepository::new();
        types
            .expect_find_by_id()
            .returning(|id| Ok(Some(item_type(id, "producto"))));

        let mut categories = MockCategoryRepository::new();
        categories
            .expect_exists_by_slug()
            .withf(|slug, _| slug == "camaras-ip")
            .times(2)
            .returning({
                let mut calls = 0;
                move |_, _| {
                    calls += 1;
                    Ok(calls > 1)
                }
            });
        categories
            .expect_create()
            .times(1)
            .returning(|insert| Ok(category(&insert.name, &insert.slug, insert.type_id)));

        let usecase = CategoryUseCase::new(Arc::new(categories), Arc::new(types));
        let model = CreateCategoryModel {
            name: " Cámaras  IP ".to_string(),
            type_id,
        };

        let created = usecase.create(Uuid::new_v4(), model.clone()).await.unwrap();
        assert_eq!(created.name, "Cámaras IP");
        assert_eq!(created.slug, "camaras-ip");

        let duplicate = usecase.create(Uuid::new_v4(), model).await;
        assert!(matches!(duplicate, Err(UseCaseError::Conflict(_))));
    }

    #[tokio::test]
    async fn unknown_type_slug_lists_nothing() {
        let mut types = MockItemTypeRepository::new();
        types.expect_find_by_slug().returning(|_| Ok(None));

        let listed = CategoryUseCase::new(Arc::new(MockCategoryRepository::new()), Arc::new(types))
            .list(CategoriesQuery {
                type_id: None,
                type_slug: Some("ghost".to_string()),
            })
            .await
            .unwrap();

        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn type_slug_resolves_to_type_filter() {
        let type_id = Uuid::new_v4();
        let mut types = MockItemTypeRepository::new();
        types
            .expect_find_by_slug()
            .withf(|slug| slug == "servicio")
            .returning(move |slug| Ok(Some(item_type(type_id, slug))));

        let mut categories = MockCategoryRepository::new();
        categories
            .expect_distinct_names()
            .withf(move |filter| *filter == Some(type_id))
            .returning(|_| Ok(vec!["Instalación".to_string(), "Soporte".to_string()]));

        let names = CategoryUseCase::new(Arc::new(categories), Arc::new(types))
            .names_by_type(CategoriesQuery {
                type_id: None,
                type_slug: Some(" Servicio ".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(names, vec!["Instalación", "Soporte"]);
    }

    #[tokio::test]
    async fn update_validates_new_type() {
        let mut types = MockItemTypeRepository::new();
        types.expect_find_by_id().returning(|_| Ok(None));

        let result = CategoryUseCase::new(Arc::new(MockCategoryRepository::new()), Arc::new(types))
            .update(
                Uuid::new_v4(),
                Uuid::new_v4(),
                UpdateCategoryModel {
                    name: None,
                    type_id: Some(Uuid::new_v4()),
                },
            )
            .await;

        assert!(matches!(result, Err(UseCaseError::Validation(_))));
    }
}
