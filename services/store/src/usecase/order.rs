use chrono::Utc;
use uuid::Uuid;

use valora_domain::order::{OrderStatus, OrderTotals, PaymentMethod, PaymentStatus};
use valora_domain::pagination::{Page, PageRequest};
use valora_domain::product::Category;

use crate::domain::repository::{
    AddressRepository, OrderRepository, ProductRepository, SettingsRepository, UserRepository,
};
use crate::domain::types::{
    Notification, Order, OrderFilter, OrderItem, OutboxEvent, Product, ShippingAddress,
    generate_order_number,
};
use crate::error::StoreError;
use crate::usecase::cart::{ensure_purchasable, ensure_within_stock};

/// One requested line. The product is identified by whichever fields the client has.
#[derive(Debug, Clone, Default)]
pub struct OrderItemRequest {
    pub product_id: Option<Uuid>,
    pub slug: Option<String>,
    pub name: Option<String>,
    pub category: Option<Category>,
    pub quantity: i32,
}

impl OrderItemRequest {
    fn label(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.slug.clone())
            .or_else(|| self.product_id.map(|id| id.to_string()))
            .unwrap_or_else(|| "unnamed item".to_owned())
    }
}

/// Match a requested line to a catalog product: id, then slug, then exact name, then a name
/// containment search within the given category.
pub(crate) async fn resolve_item<P: ProductRepository>(
    products: &P,
    item: &OrderItemRequest,
) -> Result<Option<Product>, StoreError> {
    if let Some(id) = item.product_id {
        if let Some(product) = products.find_by_id(id).await? {
            return Ok(Some(product));
        }
    }
    if let Some(slug) = item.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        if let Some(product) = products.find_by_slug(slug).await? {
            return Ok(Some(product));
        }
    }
    let name = item.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
    if let Some(name) = name {
        if let Some(product) = products.find_by_name(name).await? {
            return Ok(Some(product));
        }
        if let Some(category) = item.category {
            return products.find_by_name_in_category(category, name).await;
        }
    }
    Ok(None)
}

#[derive(Debug, Clone)]
pub enum ShippingChoice {
    Saved(Uuid),
    Inline(ShippingAddress),
}

#[derive(Debug, Clone)]
pub struct PlaceOrderInput {
    pub items: Vec<OrderItemRequest>,
    pub shipping: ShippingChoice,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

pub struct PlaceOrderUseCase<O, P, U, A, S>
where
    O: OrderRepository,
    P: ProductRepository,
    U: UserRepository,
    A: AddressRepository,
    S: SettingsRepository,
{
    pub orders: O,
    pub products: P,
    pub users: U,
    pub addresses: A,
    pub settings: S,
}

impl<O, P, U, A, S> PlaceOrderUseCase<O, P, U, A, S>
where
    O: OrderRepository,
    P: ProductRepository,
    U: UserRepository,
    A: AddressRepository,
    S: SettingsRepository,
{
    pub async fn execute(&self, user_id: Uuid, input: PlaceOrderInput) -> Result<Order, StoreError> {
        if input.items.is_empty() {
            return Err(StoreError::validation("order must contain at least one item"));
        }
        let customer = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(StoreError::UserNotFound)?;

        let shipping_address = match input.shipping {
            ShippingChoice::Saved(id) => {
                self.addresses
                    .find(user_id, id)
                    .await?
                    .ok_or(StoreError::AddressNotFound)?
                    .details
            }
            ShippingChoice::Inline(address) => {
                address.normalized().map_err(StoreError::Validation)?
            }
        };

        // Repeated products collapse into one line so the stock check sees the full quantity.
        let mut lines: Vec<(Product, i32)> = Vec::with_capacity(input.items.len());
        for item in &input.items {
            if item.quantity < 1 {
                return Err(StoreError::validation("quantity must be at least 1"));
            }
            let product = resolve_item(&self.products, item)
                .await?
                .ok_or_else(|| StoreError::UnmatchedItem(item.label()))?;
            match lines.iter_mut().find(|(p, _)| p.id == product.id) {
                Some((_, quantity)) => *quantity = quantity.saturating_add(item.quantity),
                None => lines.push((product, item.quantity)),
            }
        }

        let mut items = Vec::with_capacity(lines.len());
        for (product, quantity) in &lines {
            ensure_purchasable(product)?;
            ensure_within_stock(product, *quantity)?;
            let Some(price) = product.price else {
                return Err(StoreError::ComingSoon(product.name.clone()));
            };
            items.push(OrderItem {
                product_id: Some(product.id),
                name: product.name.clone(),
                price,
                quantity: *quantity,
                image: product.primary_image().map(str::to_owned),
            });
        }

        let shipping_charge = self.settings.shipping_charge().await?;
        let totals = OrderTotals::compute(
            items
                .iter()
                .map(|i| (i.price, u32::try_from(i.quantity).unwrap_or_default())),
            shipping_charge,
        );

        let now = Utc::now();
        let mut order = Order {
            id: Uuid::now_v7(),
            order_number: generate_order_number(now),
            user_id,
            items,
            shipping_address,
            payment_method: input.payment_method,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            subtotal: totals.subtotal,
            shipping_charge: totals.shipping_charge,
            total: totals.total,
            notes: input
                .notes
                .map(|n| n.trim().to_owned())
                .filter(|n| !n.is_empty()),
            created_at: now,
            updated_at: now,
        };

        let mut retried = false;
        loop {
            let notification = Notification::new_order(&order, &customer.name);
            let event = OutboxEvent::order_placed(&order, &customer);
            match self.orders.place(&order, &notification, &event).await {
                Err(StoreError::OrderNumberTaken) if !retried => {
                    tracing::warn!(order_number = %order.order_number, "order number collision");
                    retried = true;
                    order.order_number = generate_order_number(now);
                }
                result => break result?,
            }
        }

        tracing::info!(
            order_id = %order.id,
            order_number = %order.order_number,
            total = %order.total,
            "order placed"
        );
        Ok(order)
    }
}

pub struct ListMyOrdersUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> ListMyOrdersUseCase<O> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Page<Order>, StoreError> {
        let page = page.clamped();
        let filter = OrderFilter {
            user_id: Some(user_id),
            status,
            search: None,
        };
        let (items, total) = self.orders.list(&filter, page).await?;
        Ok(Page::new(items, page, total))
    }
}

pub struct GetOrderUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> GetOrderUseCase<O> {
    /// Visible to its owner and to admins.
    pub async fn execute(
        &self,
        requester: Uuid,
        is_admin: bool,
        id: Uuid,
    ) -> Result<Order, StoreError> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or(StoreError::OrderNotFound)?;
        if order.user_id != requester && !is_admin {
            return Err(StoreError::Forbidden);
        }
        Ok(order)
    }
}

/// Cancel, restock and notify. Paid online orders are marked refunded.
pub(crate) async fn cancel_order<O: OrderRepository>(
    orders: &O,
    order: &Order,
    by_customer: bool,
) -> Result<Order, StoreError> {
    let refund = order.payment_method == PaymentMethod::Online
        && order.payment_status == PaymentStatus::Paid;
    let payment_status = if refund {
        PaymentStatus::Refunded
    } else {
        order.payment_status
    };
    let notification = Notification::order_cancelled(order, by_customer);
    orders.cancel(order, payment_status, &notification).await?;
    tracing::info!(order_id = %order.id, by_customer, "order cancelled");
    orders
        .find_by_id(order.id)
        .await?
        .ok_or(StoreError::OrderNotFound)
}

pub struct CancelOrderUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> CancelOrderUseCase<O> {
    /// Customers may cancel their own orders while pending or confirmed.
    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> Result<Order, StoreError> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or(StoreError::OrderNotFound)?;
        if order.user_id != user_id {
            return Err(StoreError::Forbidden);
        }
        if !order.status.can_cancel() {
            return Err(StoreError::OrderNotCancellable);
        }
        cancel_order(&self.orders, &order, true).await
    }
}
