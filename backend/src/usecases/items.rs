use std::sync::Arc;

use chrono::Utc;
use crates::domain::{
    entities::items::{InsertItemEntity, UpdateItemEntity},
    repositories::{categories::CategoryRepository, items::ItemRepository},
    value_objects::{
        acks::DeletedModel,
        items::{CreateItemModel, ItemModel, ItemsFilter, ListItemsQuery, UpdateItemModel},
        pagination::{DEFAULT_LIMIT, Paged, Pagination},
        slugs::normalize_name,
    },
};
use tracing::{error, info};
use uuid::Uuid;

use super::{UseCaseError, UseCaseResult};

pub struct ItemUseCase<I, C>
where
    I: ItemRepository + Send + Sync + 'static,
    C: CategoryRepository + Send + Sync + 'static,
{
    item_repo: Arc<I>,
    category_repo: Arc<C>,
}

impl<I, C> ItemUseCase<I, C>
where
    I: ItemRepository + Send + Sync + 'static,
    C: CategoryRepository + Send + Sync + 'static,
{
    pub fn new(item_repo: Arc<I>, category_repo: Arc<C>) -> Self {
        Self {
            item_repo,
            category_repo,
        }
    }

    pub async fn create(&self, created_by: Uuid, model: CreateItemModel) -> UseCaseResult<ItemModel> {
        let name = normalize_name(&model.name);
        if name.is_empty() {
            return Err(UseCaseError::Validation("name is required".to_string()));
        }
        validate_price(model.price)?;
        validate_stock(model.stock)?;

        self.ensure_category_of_type(model.category_id, model.type_id)
            .await?;

        let item = self
            .item_repo
            .create(InsertItemEntity {
                name,
                description: model.description.trim().to_string(),
                price: model.price,
                type_id: model.type_id,
                category_id: model.category_id,
                stock: model.stock,
                created_by,
            })
            .await
            .map_err(|err| {
                error!(db_error = ?err, "items: failed to create item");
                UseCaseError::from_write(err, "item already exists")
            })?;

        info!(item_id = %item.id, "items: item created");

        Ok(item.into())
    }

    pub async fn list(&self, query: ListItemsQuery) -> UseCaseResult<Paged<ItemModel>> {
        let pagination = Pagination::new(query.page, query.limit, DEFAULT_LIMIT);
        let filter = ItemsFilter {
            q: query
                .q
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty()),
            type_id: query.type_id,
            category_id: query.category_id,
        };

        let (items, total) = self.item_repo.list(filter, pagination).await?;

        Ok(Paged::new(items, total, pagination).map(ItemModel::from))
    }

    pub async fn get(&self, item_id: Uuid) -> UseCaseResult<ItemModel> {
        self.item_repo
            .find_by_id(item_id)
            .await?
            .map(ItemModel::from)
            .ok_or_else(|| UseCaseError::NotFound("item not found".to_string()))
    }

    pub async fn update(
        &self,
        item_id: Uuid,
        updated_by: Uuid,
        model: UpdateItemModel,
    ) -> UseCaseResult<ItemModel> {
        if model.is_empty() {
            return Err(UseCaseError::Validation("nothing to update".to_string()));
        }

        let name = match model.name.as_deref().map(normalize_name) {
            Some(name) if name.is_empty() => {
                return Err(UseCaseError::Validation("name is required".to_string()));
            }
            other => other,
        };
        if let Some(price) = model.price {
            validate_price(price)?;
        }
        validate_stock(model.stock)?;

        if model.type_id.is_some() || model.category_id.is_some() {
            let current = self
                .item_repo
                .find_by_id(item_id)
                .await?
                .ok_or_else(|| UseCaseError::NotFound("item not found".to_string()))?;

            self.ensure_category_of_type(
                model.category_id.unwrap_or(current.category_id),
                model.type_id.unwrap_or(current.type_id),
            )
            .await?;
        }

        let item = self
            .item_repo
            .update(
                item_id,
                UpdateItemEntity {
                    name,
                    description: model.description.map(|d| d.trim().to_string()),
                    price: model.price,
                    type_id: model.type_id,
                    category_id: model.category_id,
                    stock: model.stock,
                    updated_by,
                    updated_at: Utc::now(),
                },
            )
            .await
            .map_err(|err| {
                error!(%item_id, db_error = ?err, "items: failed to update item");
                UseCaseError::from_write(err, "item already exists")
            })?
            .ok_or_else(|| UseCaseError::NotFound("item not found".to_string()))?;

        Ok(item.into())
    }

    pub async fn delete(&self, item_id: Uuid) -> UseCaseResult<DeletedModel> {
        let deleted = self.item_repo.delete(item_id).await?;

        if !deleted {
            return Err(UseCaseError::NotFound("item not found".to_string()));
        }

        info!(%item_id, "items: item deleted");

        Ok(DeletedModel { deleted })
    }

    pub async fn category_names(&self) -> UseCaseResult<Vec<String>> {
        Ok(self.item_repo.distinct_category_names().await?)
    }

    pub async fn type_names(&self) -> UseCaseResult<Vec<String>> {
        Ok(self.item_repo.distinct_type_names().await?)
    }

    async fn ensure_category_of_type(&self, category_id: Uuid, type_id: Uuid) -> UseCaseResult<()> {
        let category = self
            .category_repo
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| {
                UseCaseError::Validation(format!("category {category_id} does not exist"))
            })?;

        if category.type_id != type_id {
            return Err(UseCaseError::Validation(
                "category does not belong to the given type".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_price(price: f64) -> UseCaseResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(UseCaseError::Validation(
            "price must be a number >= 0".to_string(),
        ));
    }
    Ok(())
}

fn validate_stock(stock: Option<i32>) -> UseCaseResult<()> {
    if stock.is_some_and(|stock| stock < 0) {
        return Err(UseCaseError::Validation("stock must be >= 0".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crates::domain::{
        entities::{categories::CategoryEntity, items::ItemEntity},
        repositories::{categories::MockCategoryRepository, items::MockItemRepository},
    };

    use super::*;

    fn category(id: Uuid, type_id: Uuid) -> CategoryEntity {
        let now = Utc::now();
        CategoryEntity {
            id,
            name: "Cámaras".to_string(),
            slug: "camaras".to_string(),
            type_id,
            created_by: Uuid::new_v4(),
            updated_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn item(id: Uuid, type_id: Uuid, category_id: Uuid) -> ItemEntity {
        let now = Utc::now();
        ItemEntity {
            id,
            name: "Domo 4K".to_string(),
            description: String::new(),
            price: 1000.0,
            type_id,
            category_id,
            stock: Some(3),
            created_by: Uuid::new_v4(),
            updated_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn create_model(type_id: Uuid, category_id: Uuid) -> CreateItemModel {
        CreateItemModel {
            name: " Domo  4K ".to_string(),
            description: " Exterior ".to_string(),
            price: 1000.0,
            type_id,
            category_id,
            stock: Some(3),
        }
    }

    #[tokio::test]
    async fn create_checks_category_belongs_to_type() {
        let type_id = Uuid::new_v4();
        let other_type = Uuid::new_v4();
        let category_id = Uuid::new_v4();

        let mut categories = MockCategoryRepository::new();
        categories
            .expect_find_by_id()
            .returning(move |id| Ok(Some(category(id, type_id))));

        let mut items = MockItemRepository::new();
        items
            .expect_create()
            .withf(|insert| insert.name == "Domo 4K" && insert.description == "Exterior")
            .times(1)
            .returning(|insert| Ok(item(Uuid::new_v4(), insert.type_id, insert.category_id)));

        let usecase = ItemUseCase::new(Arc::new(items), Arc::new(categories));

        let mismatch = usecase
            .create(Uuid::new_v4(), create_model(other_type, category_id))
            .await;
        assert!(matches!(mismatch, Err(UseCaseError::Validation(_))));

        let created = usecase
            .create(Uuid::new_v4(), create_model(type_id, category_id))
            .await
            .unwrap();
        assert_eq!(created.category_id, category_id);
    }

    #[tokio::test]
    async fn negative_price_or_stock_is_rejected() {
        let usecase = ItemUseCase::new(
            Arc::new(MockItemRepository::new()),
            Arc::new(MockCategoryRepository::new()),
        );

        let mut negative_price = create_model(Uuid::new_v4(), Uuid::new_v4());
        negative_price.price = -1.0;
        assert!(matches!(
            usecase.create(Uuid::new_v4(), negative_price).await,
            Err(UseCaseError::Validation(_))
        ));

        let mut negative_stock = create_model(Uuid::new_v4(), Uuid::new_v4());
        negative_stock.stock = Some(-2);
        assert!(matches!(
            usecase.create(Uuid::new_v4(), negative_stock).await,
            Err(UseCaseError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn update_validates_resulting_type_category_pair() {
        let item_id = Uuid::new_v4();
        let type_id = Uuid::new_v4();
        let old_category = Uuid::new_v4();
        let new_type = Uuid::new_v4();

        let mut items = MockItemRepository::new();
        items
            .expect_find_by_id()
            .returning(move |id| Ok(Some(item(id, type_id, old_category))));

        let mut categories = MockCategoryRepository::new();
        categories
            .expect_find_by_id()
            .withf(move |id| *id == old_category)
            .returning(move |id| Ok(Some(category(id, type_id))));

        let result = ItemUseCase::new(Arc::new(items), Arc::new(categories))
            .update(
                item_id,
                Uuid::new_v4(),
                UpdateItemModel {
                    type_id: Some(new_type),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(UseCaseError::Validation(_))));
    }

    #[tokio::test]
    async fn price_only_update_skips_category_lookup() {
        let mut items = MockItemRepository::new();
        items
            .expect_update()
            .withf(|_, changes| changes.price == Some(1500.0) && changes.type_id.is_none())
            .times(1)
            .returning(|id, _| Ok(Some(item(id, Uuid::new_v4(), Uuid::new_v4()))));

        ItemUseCase::new(Arc::new(items), Arc::new(MockCategoryRepository::new()))
            .update(
                Uuid::new_v4(),
                Uuid::new_v4(),
                UpdateItemModel {
                    price: Some(1500.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn empty_patch_is_rejected() {
        let result = ItemUseCase::new(
            Arc::new(MockItemRepository::new()),
            Arc::new(MockCategoryRepository::new()),
        )
        .update(Uuid::new_v4(), Uuid::new_v4(), UpdateItemModel::default())
        .await;

        assert!(matches!(result, Err(UseCaseError::Validation(_))));
    }
}
