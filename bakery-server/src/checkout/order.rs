//! 下单流程
//!
//! 单价和总额按购物车提交的值接受: 不重新定价, 不扣减库存。

use shared::models::{OrderItem, OrderStatus};
use shared::money;
use shared::request::{CreateOrderRequest, OrderItemInput};

use super::{Checkout, PostCommit, SideTask};
use crate::db::models::Order;
use crate::db::repository::OrderRepository;
use crate::services::notification::Notification;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, normalize_optional,
    validate_optional_email, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// 单行最大数量
pub const MAX_ITEM_QUANTITY: i64 = 1000;

/// 最多行数
pub const MAX_ORDER_LINES: usize = 100;

/// 统一的蛋糕 ID 形式: `cake:{key}`
fn normalize_cake_ref(cake: &str) -> String {
    let cake = cake.trim();
    if cake.contains(':') {
        cake.to_string()
    } else {
        format!("cake:{}", cake)
    }
}

fn validate_item(index: usize, item: &OrderItemInput) -> AppResult<OrderItem> {
    let invalid = |msg: String| {
        AppError::with_message(ErrorCode::InvalidOrderItem, msg).with_detail("index", index)
    };

    if item.cake.trim().is_empty() {
        return Err(invalid(format!("items[{}].cake is required", index)));
    }
    if item.cake.len() > MAX_SHORT_TEXT_LEN {
        return Err(invalid(format!("items[{}].cake is too long", index)));
    }
    if !(1..=MAX_ITEM_QUANTITY).contains(&item.quantity) {
        return Err(invalid(format!(
            "items[{}].quantity must be between 1 and {}",
            index, MAX_ITEM_QUANTITY
        )));
    }
    if !money::is_valid_amount(item.price) {
        return Err(invalid(format!("items[{}].price is invalid", index)));
    }

    Ok(OrderItem {
        cake: normalize_cake_ref(&item.cake),
        quantity: item.quantity as u32,
        price: item.price,
    })
}

/// 边界校验, 通过后返回待持久化的订单
pub fn validate_order(req: &CreateOrderRequest) -> AppResult<Order> {
    validate_required_text(&req.customer_name, "customerName", MAX_NAME_LEN)?;
    validate_required_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&req.delivery_location, "deliveryLocation", MAX_ADDRESS_LEN)?;
    validate_optional_email(&req.email, "email")?;
    validate_optional_text(&req.message, "message", MAX_NOTE_LEN)?;
    validate_optional_text(&req.special_instructions, "specialInstructions", MAX_NOTE_LEN)?;

    if req.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    if req.items.len() > MAX_ORDER_LINES {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("An order may contain at most {} lines", MAX_ORDER_LINES),
        ));
    }
    let items = req
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| validate_item(i, item))
        .collect::<AppResult<Vec<_>>>()?;

    if !money::is_valid_amount(req.total_amount) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "totalAmount must be a non-negative amount",
        ));
    }

    Ok(Order {
        id: None,
        customer_name: req.customer_name.trim().to_string(),
        phone: req.phone.trim().to_string(),
        email: normalize_optional(req.email.clone()),
        delivery_location: req.delivery_location.trim().to_string(),
        items,
        total_amount: money::to_f64(money::to_decimal(req.total_amount)),
        message: normalize_optional(req.message.clone()),
        special_instructions: normalize_optional(req.special_instructions.clone()),
        status: OrderStatus::Pending,
        created_at: 0,
        updated_at: 0,
    })
}

impl Checkout {
    /// 校验 → 持久化 → 通知员工
    pub async fn place_order(&self, req: CreateOrderRequest) -> AppResult<Order> {
        let order = validate_order(&req)?;

        let order = OrderRepository::new(self.db.clone()).create(order).await?;
        tracing::info!(
            order_id = %order.id_string(),
            customer = %order.customer_name,
            total = order.total_amount,
            items = order.items.len(),
            "Order placed"
        );

        PostCommit::new()
            .then(SideTask::NotifyStaff(Notification::NewOrder(Box::new(
                order.clone(),
            ))))
            .run(&self.notifier);

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateOrderRequest {
        CreateOrderRequest {
            customer_name: " Jane ".into(),
            phone: "0712345678".into(),
            email: Some("".into()),
            delivery_location: "Westlands".into(),
            items: vec![OrderItemInput {
                cake: "abc".into(),
                quantity: 3,
                price: 2500.0,
            }],
            total_amount: 7500.0,
            message: None,
            special_instructions: Some("  ".into()),
        }
    }

    #[test]
    fn test_valid_order_is_normalized() {
        let order = validate_order(&request()).unwrap();
        assert_eq!(order.customer_name, "Jane");
        assert_eq!(order.email, None);
        assert_eq!(order.special_instructions, None);
        assert_eq!(order.items[0].cake, "cake:abc");
        assert_eq!(order.items[0].quantity, 3);
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_missing_required_fields() {
        for field in ["customerName", "phone", "deliveryLocation"] {
            let mut req = request();
            match field {
                "customerName" => req.customer_name.clear(),
                "phone" => req.phone.clear(),
                _ => req.delivery_location.clear(),
            }
            let err = validate_order(&req).unwrap_err();
            assert_eq!(err.code, ErrorCode::RequiredField, "{field}");
            assert!(err.message.contains(field));
        }
    }

    #[test]
    fn test_empty_order_rejected() {
        let mut req = request();
        req.items.clear();
        assert_eq!(validate_order(&req).unwrap_err().code, ErrorCode::OrderEmpty);
    }

    #[test]
    fn test_bad_items_rejected() {
        let mut req = request();
        req.items[0].quantity = 0;
        assert_eq!(
            validate_order(&req).unwrap_err().code,
            ErrorCode::InvalidOrderItem
        );

        let mut req = request();
        req.items[0].price = -1.0;
        assert_eq!(
            validate_order(&req).unwrap_err().code,
            ErrorCode::InvalidOrderItem
        );

        let mut req = request();
        req.total_amount = f64::NAN;
        assert_eq!(
            validate_order(&req).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut req = request();
        req.email = Some("nope".into());
        assert_eq!(
            validate_order(&req).unwrap_err().code,
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn test_client_prices_are_kept() {
        // 总额与行合计不一致时也按提交值保存
        let mut req = request();
        req.total_amount = 100.0;
        assert_eq!(validate_order(&req).unwrap().total_amount, 100.0);
    }

    #[tokio::test]
    async fn test_place_order_persists_and_notifies() {
        let db = crate::db::DbService::memory().await.unwrap().db;
        let (notifier, mut rx) = crate::services::notification::NotificationService::new(4);
        let images = std::sync::Arc::new(crate::services::images::LocalImageStore::new(
            std::env::temp_dir(),
            "http://localhost",
        ));
        let checkout = Checkout::new(db.clone(), notifier, images);

        let order = checkout.place_order(request()).await.unwrap();
        assert!(order.id.is_some());
        assert!(order.created_at > 0);

        let notification = rx.try_recv().unwrap();
        assert_eq!(notification.kind(), "new_order");
        assert_eq!(OrderRepository::new(db).count().await.unwrap(), 1);
    }
}
