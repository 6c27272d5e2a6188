use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Storage-assigned product identifier.
pub type ProductId = i64;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;
/// Highest page number whose row offset still fits a Postgres `BIGINT`.
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_PAGE_SIZE;

/// A persisted product. Only storage hands these out, so every value has an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    category: String,
    name: String,
}

impl Product {
    pub(crate) fn new(id: ProductId, category: String, name: String) -> Self {
        Self { id, category, name }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn recategorize(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }
}

/// A product that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub category: String,
    pub name: String,
}

impl NewProduct {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
        }
    }
}

/// Rejects strings made only of whitespace.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Body of `POST /products`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 255), custom(function = "not_blank"))]
    #[schema(example = "Books", min_length = 1, max_length = 255)]
    pub category: String,
    #[validate(length(min = 1, max = 255), custom(function = "not_blank"))]
    #[schema(example = "Atlas", min_length = 1, max_length = 255)]
    pub name: String,
}

impl From<CreateProduct> for NewProduct {
    fn from(input: CreateProduct) -> Self {
        NewProduct::new(input.category, input.name)
    }
}

/// Body of `PUT /products/{id}`. Both fields are replaced wholesale.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 255), custom(function = "not_blank"))]
    #[schema(example = "Maps", min_length = 1, max_length = 255)]
    pub category: String,
    #[validate(length(min = 1, max = 255), custom(function = "not_blank"))]
    #[schema(example = "Atlas", min_length = 1, max_length = 255)]
    pub name: String,
}

/// Query of `GET /products`
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProducts {
    /// Exact category to filter on
    #[validate(length(min = 1, max = 255), custom(function = "not_blank"))]
    pub category: String,
    /// Zero-based page number
    #[serde(default)]
    #[validate(range(max = MAX_PAGE))]
    #[param(minimum = 0, default = 0)]
    pub page: u64,
    /// Page size
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100))]
    #[param(minimum = 1, maximum = 100, default = 10)]
    pub size: u64,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// Ordering the storage port can apply. The service always lists by
/// category ascending; the other keys exist for adapters and their tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Id,
    #[default]
    Category,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// What the storage port needs to cut one page. Ties on the sort key are
/// broken by id ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub category: String,
    pub page: u64,
    pub size: u64,
    pub sort_key: SortKey,
    pub direction: SortDirection,
}

impl From<ListProducts> for PageRequest {
    fn from(query: ListProducts) -> Self {
        Self {
            category: query.category,
            page: query.page,
            size: query.size,
            sort_key: SortKey::Category,
            direction: SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: u64,
    pub total_elements: u64,
    pub page: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            total_elements: self.total_elements,
            page: self.page,
        }
    }
}

/// Wire shape of a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[schema(example = 1)]
    pub id: ProductId,
    #[schema(example = "Books")]
    pub category: String,
    #[schema(example = "Atlas")]
    pub name: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            category: product.category,
            name: product.name,
        }
    }
}

/// Wire shape of one page of products
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPageResponse {
    pub items: Vec<ProductResponse>,
    pub total_pages: u64,
    pub total_elements: u64,
    pub page: u64,
}

impl From<Page<Product>> for ProductPageResponse {
    fn from(page: Page<Product>) -> Self {
        let page = page.map(ProductResponse::from);
        Self {
            items: page.items,
            total_pages: page.total_pages,
            total_elements: page.total_elements,
            page: page.page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_transitions() {
        let mut product = Product::new(1, "Books".into(), "Atlas".into());
        product.recategorize("Maps");
        product.rename("World Atlas");

        assert_eq!(product.id(), 1);
        assert_eq!(product.category(), "Maps");
        assert_eq!(product.name(), "World Atlas");
    }

    #[test]
    fn test_create_product_validation() {
        let valid = CreateProduct {
            category: "Books".into(),
            name: "Atlas".into(),
        };
        assert!(valid.validate().is_ok());

        let blank = CreateProduct {
            category: "   ".into(),
            name: "Atlas".into(),
        };
        let errors = blank.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("category"));

        let empty = CreateProduct {
            category: "Books".into(),
            name: String::new(),
        };
        assert!(empty.validate().unwrap_err().field_errors().contains_key("name"));

        let too_long = CreateProduct {
            category: "Books".into(),
            name: "x".repeat(256),
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_list_products_defaults() {
        let query: ListProducts = serde_json::from_str(r#"{"category":"Books"}"#).unwrap();
        assert_eq!(query.page, 0);
        assert_eq!(query.size, DEFAULT_PAGE_SIZE);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_list_products_size_bounds() {
        for (size, ok) in [(0, false), (1, true), (MAX_PAGE_SIZE, true), (MAX_PAGE_SIZE + 1, false)] {
            let query = ListProducts {
                category: "Books".into(),
                page: 0,
                size,
            };
            assert_eq!(query.validate().is_ok(), ok, "size {}", size);
        }
    }

    #[test]
    fn test_list_products_page_bound() {
        let at_bound = ListProducts {
            category: "Books".into(),
            page: MAX_PAGE,
            size: MAX_PAGE_SIZE,
        };
        assert!(at_bound.validate().is_ok());
        assert!(MAX_PAGE.checked_mul(MAX_PAGE_SIZE).is_some_and(|offset| offset <= i64::MAX as u64));

        let beyond = ListProducts {
            page: MAX_PAGE + 1,
            ..at_bound
        };
        let errors = beyond.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("page"));
    }

    #[test]
    fn test_page_request_sorts_by_category() {
        let request = PageRequest::from(ListProducts {
            category: "Books".into(),
            page: 2,
            size: 5,
        });
        assert_eq!(request.sort_key, SortKey::Category);
        assert_eq!(request.direction, SortDirection::Asc);
        assert_eq!(request.page, 2);
    }

    #[test]
    fn test_page_response_is_camel_case() {
        let page = Page {
            items: vec![Product::new(3, "Books".into(), "Atlas".into())],
            total_pages: 1,
            total_elements: 1,
            page: 0,
        };
        let json = serde_json::to_value(ProductPageResponse::from(page)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "items": [{"id": 3, "category": "Books", "name": "Atlas"}],
                "totalPages": 1,
                "totalElements": 1,
                "page": 0
            })
        );
    }
}
