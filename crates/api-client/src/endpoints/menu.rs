//! Menu endpoints
//!
//! Nomenclature (the full product tree), external menus, stop lists and combos.

use super::Caller;
use crate::client::IikoClient;
use crate::error::ApiResult;
use crate::response::{IdName, Outcome};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Menu API interface
#[derive(Clone, Debug)]
pub struct MenuApi {
    caller: Caller,
}

impl MenuApi {
    pub(crate) fn new(client: IikoClient) -> Self {
        Self {
            caller: Caller::new(client),
        }
    }

    /// Override the vendor `Timeout` for calls made through this interface
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.caller.set_timeout(timeout);
        self
    }

    /// Nomenclature of an organization, optionally only changes since `start_revision`
    ///
    /// POST /api/1/nomenclature
    pub async fn nomenclature(
        &self,
        organization_id: &str,
        start_revision: Option<i64>,
    ) -> ApiResult<Outcome<Nomenclature>> {
        self.caller
            .call(
                "/api/1/nomenclature",
                &NomenclatureRequest {
                    organization_id,
                    start_revision,
                },
            )
            .await
    }

    /// External menus and price categories
    ///
    /// POST /api/2/menu
    pub async fn external_menus(&self) -> ApiResult<Outcome<ExternalMenus>> {
        self.caller.call_empty("/api/2/menu").await
    }

    /// One external menu with its categories and items
    ///
    /// POST /api/2/menu/by_id
    pub async fn menu_by_id(&self, params: &MenuByIdParams) -> ApiResult<Outcome<MenuById>> {
        self.caller.call("/api/2/menu/by_id", params).await
    }

    /// Out-of-stock items per terminal group
    ///
    /// POST /api/1/stop_lists
    pub async fn stop_lists(
        &self,
        params: &StopListsParams,
    ) -> ApiResult<Outcome<StopListsResponse>> {
        self.caller.call("/api/1/stop_lists", params).await
    }

    /// Check order items against the stop list of a terminal group
    ///
    /// POST /api/1/stop_lists/check
    pub async fn check_stop_lists(
        &self,
        organization_id: &str,
        terminal_group_id: &str,
        items: &Value,
    ) -> ApiResult<Outcome<CheckStopListsResponse>> {
        self.caller
            .call(
                "/api/1/stop_lists/check",
                &CheckStopListsRequest {
                    organization_id,
                    terminal_group_id,
                    items,
                },
            )
            .await
    }

    /// Combo specifications and categories
    ///
    /// POST /api/1/combo
    pub async fn combos(&self, organization_id: &str) -> ApiResult<Outcome<CombosResponse>> {
        self.caller
            .call("/api/1/combo", &OrganizationRequest { organization_id })
            .await
    }

    /// Price of a combo for the given items
    ///
    /// POST /api/1/combo/calculate
    pub async fn calculate_combo(
        &self,
        organization_id: &str,
        items: &Value,
    ) -> ApiResult<Outcome<ComboCalculation>> {
        self.caller
            .call(
                "/api/1/combo/calculate",
                &CalculateComboRequest {
                    organization_id,
                    items,
                },
            )
            .await
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OrganizationRequest<'a> {
    organization_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NomenclatureRequest<'a> {
    organization_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_revision: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckStopListsRequest<'a> {
    organization_id: &'a str,
    terminal_group_id: &'a str,
    items: &'a Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculateComboRequest<'a> {
    organization_id: &'a str,
    items: &'a Value,
}

/// Parameters for `menu_by_id`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuByIdParams {
    /// External menu ID
    pub external_menu_id: String,
    /// Organizations the prices are taken from
    pub organization_ids: Vec<String>,
    /// Price category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_category_id: Option<String>,
}

impl MenuByIdParams {
    /// Parameters for one external menu
    pub fn new(external_menu_id: impl Into<String>, organization_ids: Vec<String>) -> Self {
        Self {
            external_menu_id: external_menu_id.into(),
            organization_ids,
            price_category_id: None,
        }
    }

    /// Use a specific price category
    #[must_use]
    pub fn with_price_category(mut self, id: impl Into<String>) -> Self {
        self.price_category_id = Some(id.into());
        self
    }
}

/// Parameters for `stop_lists`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopListsParams {
    /// Organizations to read stop lists for
    pub organization_ids: Vec<String>,
    /// Return size-level balances
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_size: Option<bool>,
    /// Restrict to these terminal groups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal_groups_ids: Option<Vec<String>>,
}

impl StopListsParams {
    /// Stop lists of the given organizations
    #[must_use]
    pub fn new(organization_ids: Vec<String>) -> Self {
        Self {
            organization_ids,
            ..Self::default()
        }
    }

    /// Ask for size-level balances
    #[must_use]
    pub fn with_return_size(mut self, enabled: bool) -> Self {
        self.return_size = Some(enabled);
        self
    }

    /// Restrict to the given terminal groups
    #[must_use]
    pub fn with_terminal_groups(mut self, ids: Vec<String>) -> Self {
        self.terminal_groups_ids = Some(ids);
        self
    }
}

/// A nomenclature group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductGroup {
    /// ID
    pub id: String,
    /// SKU
    pub code: Option<String>,
    /// Name
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// Additional information
    pub additional_info: Option<String>,
    /// Tags
    pub tags: Option<Vec<String>>,
    /// Image links
    #[serde(default)]
    pub image_links: Vec<String>,
    /// Parent group
    pub parent_group: Option<String>,
    /// Order (priority) in the menu
    #[serde(default)]
    pub order: i64,
    /// On-the-menu attribute
    #[serde(default)]
    pub is_included_in_menu: bool,
    /// Group modifier (`true`) or menu group (`false`)
    #[serde(default)]
    pub is_group_modifier: bool,
    /// Deleted
    pub is_deleted: Option<bool>,
    /// SEO description
    pub seo_description: Option<String>,
    /// SEO text
    pub seo_text: Option<String>,
    /// SEO keywords
    pub seo_keywords: Option<String>,
    /// SEO title
    pub seo_title: Option<String>,
}

/// A product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategory {
    /// ID
    pub id: String,
    /// Name
    pub name: String,
    /// Deleted
    #[serde(default)]
    pub is_deleted: bool,
}

/// A product size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSize {
    /// ID
    pub id: String,
    /// Name
    pub name: String,
    /// Priority
    pub priority: Option<i64>,
    /// Default size
    pub is_default: Option<bool>,
}

/// Price of a product in one size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Current price
    pub current_price: Option<f64>,
    /// Included in the menu
    #[serde(default)]
    pub is_included_in_menu: bool,
    /// Scheduled price
    pub next_price: Option<f64>,
    /// Scheduled menu inclusion
    #[serde(default)]
    pub next_included_in_menu: bool,
    /// When the scheduled price takes effect
    pub next_date_price: Option<String>,
}

/// Size-specific price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizePrice {
    /// Size ID, absent for products without sizes
    pub size_id: Option<String>,
    /// Price
    pub price: Price,
}

/// A modifier attached to a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modifier {
    /// Modifier product ID
    pub id: String,
    /// Default amount
    pub default_amount: Option<i64>,
    /// Minimal amount
    #[serde(default)]
    pub min_amount: i64,
    /// Maximal amount
    #[serde(default)]
    pub max_amount: i64,
    /// Required
    pub required: Option<bool>,
    /// Hide when the amount equals the default
    pub hide_if_default_amount: Option<bool>,
    /// Can be split
    pub splittable: Option<bool>,
    /// Amount given free of charge
    pub free_of_charge_amount: Option<i64>,
}

/// A group modifier attached to a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupModifier {
    /// Modifier group ID
    pub id: String,
    /// Minimal amount
    #[serde(default)]
    pub min_amount: i64,
    /// Maximal amount
    #[serde(default)]
    pub max_amount: i64,
    /// Required
    #[serde(default)]
    pub required: bool,
    /// Whether child modifiers have their own limits
    pub child_modifiers_have_min_max_restrictions: Option<bool>,
    /// Child modifiers
    #[serde(default)]
    pub child_modifiers: Vec<Modifier>,
    /// Hide when the amount equals the default
    pub hide_if_default_amount: Option<bool>,
    /// Default amount
    pub default_amount: Option<i64>,
    /// Can be split
    pub splittable: Option<bool>,
    /// Amount given free of charge
    pub free_of_charge_amount: Option<i64>,
}

/// A nomenclature product (dish, good, modifier or service)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// ID
    pub id: String,
    /// SKU
    pub code: Option<String>,
    /// Name
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// Additional information
    pub additional_info: Option<String>,
    /// Tags
    pub tags: Option<Vec<String>>,
    /// Fat per 100 g
    pub fat_amount: Option<f64>,
    /// Proteins per 100 g
    pub proteins_amount: Option<f64>,
    /// Carbohydrates per 100 g
    pub carbohydrates_amount: Option<f64>,
    /// Energy per 100 g
    pub energy_amount: Option<f64>,
    /// Fat per item
    pub fat_full_amount: Option<f64>,
    /// Proteins per item
    pub proteins_full_amount: Option<f64>,
    /// Carbohydrates per item
    pub carbohydrates_full_amount: Option<f64>,
    /// Energy per item
    pub energy_full_amount: Option<f64>,
    /// Weight in kg
    pub weight: Option<f64>,
    /// Nomenclature group
    pub group_id: Option<String>,
    /// Product category
    pub product_category_id: Option<String>,
    /// `dish`, `good`, `modifier` or `service`
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    /// `Product` or `Compound`
    pub order_item_type: Option<String>,
    /// Modifier schema ID
    pub modifier_schema_id: Option<String>,
    /// Modifier schema name
    pub modifier_schema_name: Option<String>,
    /// Can be split
    #[serde(default)]
    pub splittable: bool,
    /// Measure unit
    pub measure_unit: Option<String>,
    /// Prices per size
    #[serde(default)]
    pub size_prices: Vec<SizePrice>,
    /// Modifiers
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    /// Group modifiers
    #[serde(default)]
    pub group_modifiers: Vec<GroupModifier>,
    /// Image links
    #[serde(default)]
    pub image_links: Vec<String>,
    /// Hidden on the receipt
    #[serde(default)]
    pub do_not_print_in_cheque: bool,
    /// Parent group
    pub parent_group: Option<String>,
    /// Order (priority) in the menu
    #[serde(default)]
    pub order: i64,
    /// English name
    pub full_name_english: Option<String>,
    /// Sold from stock balance
    #[serde(default)]
    pub use_balance_for_sell: bool,
    /// Price can be set at the terminal
    #[serde(default)]
    pub can_set_open_price: bool,
    /// Deleted
    pub is_deleted: Option<bool>,
    /// SEO description
    pub seo_description: Option<String>,
    /// SEO text
    pub seo_text: Option<String>,
    /// SEO keywords
    pub seo_keywords: Option<String>,
    /// SEO title
    pub seo_title: Option<String>,
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Response of `nomenclature`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nomenclature {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// Groups
    #[serde(default)]
    pub groups: Vec<ProductGroup>,
    /// Product categories
    #[serde(default)]
    pub product_categories: Vec<ProductCategory>,
    /// Products
    #[serde(default)]
    pub products: Vec<Product>,
    /// Sizes
    #[serde(default)]
    pub sizes: Vec<ProductSize>,
    /// Revision to pass as `start_revision` next time
    pub revision: i64,
}

impl Nomenclature {
    /// Find a product by ID
    #[must_use]
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products that belong to a group
    pub fn products_in_group<'a>(&'a self, group_id: &'a str) -> impl Iterator<Item = &'a Product> {
        self.products
            .iter()
            .filter(move |p| p.parent_group.as_deref() == Some(group_id))
    }
}

/// Response of `external_menus`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalMenus {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// External menus
    #[serde(default)]
    pub external_menus: Vec<IdName>,
    /// Price categories
    #[serde(default)]
    pub price_categories: Vec<IdName>,
}

/// Allergen group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergenGroup {
    /// ID
    pub id: String,
    /// Code
    pub code: Option<String>,
    /// Name
    pub name: String,
}

/// Tax category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCategory {
    /// ID
    pub id: String,
    /// Name
    pub name: String,
    /// Tax rate
    pub percentage: Option<f64>,
}

/// Price of a menu item in one organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationPrice {
    /// Organization ID
    pub organization_id: String,
    /// Price, absent when the item is not sold there
    pub price: Option<f64>,
}

/// Quantity limits of a modifier or modifier group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restrictions {
    /// Minimal quantity
    #[serde(default)]
    pub min_quantity: i64,
    /// Maximal quantity
    #[serde(default)]
    pub max_quantity: i64,
    /// Quantity given free of charge
    #[serde(default)]
    pub free_quantity: i64,
    /// Default quantity
    #[serde(default)]
    pub by_default: i64,
}

/// A modifier inside an external-menu modifier group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuModifier {
    /// Item ID
    pub item_id: String,
    /// SKU
    pub sku: Option<String>,
    /// Name
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// Prices per organization
    #[serde(default)]
    pub prices: Vec<OrganizationPrice>,
    /// Quantity limits
    pub restrictions: Option<Restrictions>,
    /// Portion weight
    pub portion_weight_grams: Option<f64>,
}

/// A modifier group of an external-menu item size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuModifierGroup {
    /// Group ID
    pub item_group_id: Option<String>,
    /// SKU
    pub sku: Option<String>,
    /// Name
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// Quantity limits
    pub restrictions: Option<Restrictions>,
    /// Whether an item can be split between halves
    #[serde(default)]
    pub can_be_divided: bool,
    /// Whether child modifiers have their own limits
    #[serde(default)]
    pub child_modifiers_have_min_max_restrictions: bool,
    /// Modifiers
    #[serde(default)]
    pub items: Vec<MenuModifier>,
}

/// One size of an external-menu item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemSize {
    /// Size ID
    pub size_id: Option<String>,
    /// SKU
    pub sku: Option<String>,
    /// Size code
    pub size_code: Option<String>,
    /// Size name
    pub size_name: Option<String>,
    /// Default size
    pub is_default: Option<bool>,
    /// Portion weight
    pub portion_weight_grams: Option<f64>,
    /// Prices per organization
    #[serde(default)]
    pub prices: Vec<OrganizationPrice>,
    /// Modifier groups
    #[serde(default)]
    pub item_modifier_groups: Vec<MenuModifierGroup>,
    /// Button image
    pub button_image_url: Option<String>,
    /// Cropped button image
    pub button_image_cropped_url: Option<String>,
}

/// An item of an external menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Item ID
    pub item_id: String,
    /// SKU
    pub sku: Option<String>,
    /// Name
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// Allergen groups
    #[serde(default)]
    pub allergen_groups: Vec<AllergenGroup>,
    /// Modifier schema
    pub modifier_schema_id: Option<String>,
    /// Tax category
    pub tax_category: Option<TaxCategory>,
    /// `Product` or `Compound`
    pub order_item_type: Option<String>,
    /// Sizes
    #[serde(default)]
    pub item_sizes: Vec<MenuItemSize>,
}

/// A category of an external menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuCategory {
    /// ID
    pub id: String,
    /// Name
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// Button image
    pub button_image_url: Option<String>,
    /// Header image
    pub header_image_url: Option<String>,
    /// Items
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// Response of `menu_by_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuById {
    /// Menu ID, numeric or string depending on the API version
    pub id: Value,
    /// Menu name
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// Categories
    #[serde(default)]
    pub item_categories: Vec<MenuCategory>,
}

/// Remaining balance of a product in a stop list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopListItem {
    /// Remaining balance
    pub balance: f64,
    /// Product ID
    pub product_id: String,
    /// Size ID
    pub size_id: Option<String>,
}

/// Stop list of one terminal group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalGroupStopList {
    /// Terminal group ID
    pub terminal_group_id: Option<String>,
    /// Items
    #[serde(default)]
    pub items: Vec<StopListItem>,
}

/// Stop lists of one organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationStopLists {
    /// Organization ID
    pub organization_id: String,
    /// Stop lists per terminal group
    #[serde(default)]
    pub items: Vec<TerminalGroupStopList>,
}

/// Response of `stop_lists`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopListsResponse {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// Stop lists grouped by organization
    #[serde(default)]
    pub terminal_group_stop_lists: Vec<OrganizationStopLists>,
}

/// Response of `check_stop_lists`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStopListsResponse {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// Items that cannot be sold
    #[serde(default)]
    pub rejected_items: Vec<StopListItem>,
}

/// A product allowed in a combo group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboProduct {
    /// Product ID
    pub product_id: String,
    /// Size ID
    pub size_id: Option<String>,
    /// Modifiers that cannot be added
    pub forbidden_modifiers: Option<Value>,
    /// Price change when this product is chosen
    pub price_modification_amount: Option<f64>,
}

/// A group of a combo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboGroup {
    /// ID
    pub id: String,
    /// Name
    pub name: String,
    /// Main group
    #[serde(default)]
    pub is_main_group: bool,
    /// Products
    #[serde(default)]
    pub products: Vec<ComboProduct>,
}

/// A combo specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboSpecification {
    /// Source promotion ID
    pub source_action_id: String,
    /// Combo category
    pub category_id: Option<String>,
    /// Name
    pub name: String,
    /// Price modification kind
    pub price_modification_type: i64,
    /// Price modification
    pub price_modification: f64,
    /// Groups
    #[serde(default)]
    pub groups: Vec<ComboGroup>,
}

/// Response of `combos`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombosResponse {
    /// Combo specifications
    #[serde(default)]
    pub combo_specifications: Vec<ComboSpecification>,
    /// Combo categories
    #[serde(default)]
    pub combo_categories: Vec<IdName>,
}

/// Response of `calculate_combo`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboCalculation {
    /// Combo price
    pub price: f64,
    /// Groups whose selection is incomplete or invalid
    #[serde(default)]
    pub incorrectly_filled_groups: Vec<String>,
}
