//! 邮件模板
//!
//! 纯函数: 通知 → 邮件内容。所有用户输入都经过 HTML 转义。

use super::EmailMessage;
use crate::db::models::{CustomCakeRequest, Order};
use shared::money::format_amount;
use shared::util::millis_to_rfc3339;

/// 最小 HTML 转义
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn row(label: &str, value: &str) -> String {
    format!("<p><strong>{}:</strong> {}</p>", label, escape(value))
}

fn optional_row(label: &str, value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| row(label, v))
        .unwrap_or_default()
}

fn layout(color: &str, heading: &str, body: &str, link: &str, link_text: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: {color};">{heading}</h2>
  <div style="background: #f8fafc; padding: 20px; border-radius: 10px;">{body}</div>
  <p style="margin-top: 20px;"><a href="{link}" style="background: {color}; color: white; padding: 10px 20px; text-decoration: none; border-radius: 5px;">{link_text}</a></p>
</div>"#
    )
}

/// 新订单 → 员工
pub fn new_order(order: &Order, to: &str, dashboard_url: &str) -> EmailMessage {
    let short_ref = order.short_ref();
    let body = [
        "<h3>Order Details:</h3>".to_string(),
        row("Order ID", &format!("#{}", short_ref)),
        row("Customer", &order.customer_name),
        row("Phone", &order.phone),
        row("Location", &order.delivery_location),
        row(
            "Total Amount",
            &format!("KSh {}", format_amount(order.total_amount)),
        ),
        row("Items", &format!("{} item(s)", order.items.len())),
        optional_row("Customer Message", order.message.as_deref()),
        optional_row("Special Instructions", order.special_instructions.as_deref()),
    ]
    .concat();

    EmailMessage {
        to: to.to_string(),
        subject: format!("🎂 New Order Received - #{}", short_ref),
        html: layout(
            "#a855f7",
            "🎂 New Cake Order!",
            &body,
            &format!("{}/admin/orders", dashboard_url.trim_end_matches('/')),
            "View Order in Dashboard",
        ),
    }
}

/// 新定制申请 → 员工
pub fn custom_request(request: &CustomCakeRequest, to: &str, dashboard_url: &str) -> EmailMessage {
    let images = if request.reference_images.is_empty() {
        "<p><strong>Reference Images:</strong> No images provided</p>".to_string()
    } else {
        let links = request
            .reference_images
            .iter()
            .map(|url| {
                let url = escape(url);
                format!(
                    r#"<a href="{url}" target="_blank" style="margin-right: 10px;"><img src="{url}" alt="Reference" style="width: 100px; height: 100px; object-fit: cover; border-radius: 5px;"></a>"#
                )
            })
            .collect::<String>();
        format!(
            "<p><strong>Reference Images:</strong> {} image(s) uploaded</p><div>{}</div>",
            request.reference_images.len(),
            links
        )
    };

    let body = [
        "<h3>Request Details:</h3>".to_string(),
        row("Customer", &request.customer_name),
        row("Phone", &request.phone),
        row(
            "Email",
            request.email.as_deref().unwrap_or("Not provided"),
        ),
        row("Occasion", &request.occasion),
        row("Cake Size", request.cake_size.as_str()),
        row("Flavor", &request.flavor),
        row("Icing", &request.icing),
        row(
            "Color Scheme",
            request.color.as_deref().unwrap_or("Not specified"),
        ),
        row(
            "Budget",
            &request
                .budget
                .map(|b| format!("KSh {}", format_amount(b)))
                .unwrap_or_else(|| "Not specified".to_string()),
        ),
        row(
            "Delivery Date",
            request.delivery_date.as_deref().unwrap_or("Not specified"),
        ),
        images,
        row("Design Description", &request.design_description),
        optional_row("Cake Message", request.message.as_deref()),
        optional_row("Special Instructions", request.special_instructions.as_deref()),
    ]
    .concat();

    EmailMessage {
        to: to.to_string(),
        subject: format!("🎨 New Custom Cake Request - {}", request.occasion),
        html: layout(
            "#ec4899",
            "🎨 New Custom Cake Request!",
            &body,
            &format!("{}/admin/custom", dashboard_url.trim_end_matches('/')),
            "View Request in Dashboard",
        ),
    }
}

/// 订单状态变更 → 客户; 没有邮箱时返回 None
pub fn order_status_changed(order: &Order, shop_url: &str) -> Option<EmailMessage> {
    let to = order.email.as_deref().map(str::trim).filter(|e| !e.is_empty())?;
    let short_ref = order.short_ref();
    let body = [
        row("Order ID", &format!("#{}", short_ref)),
        row("Status", order.status.as_str()),
        row(
            "Total Amount",
            &format!("KSh {}", format_amount(order.total_amount)),
        ),
        row(
            "Updated",
            &millis_to_rfc3339(order.updated_at),
        ),
    ]
    .concat();

    Some(EmailMessage {
        to: to.to_string(),
        subject: format!("Your order #{} is now {}", short_ref, order.status),
        html: layout(
            "#a855f7",
            &format!("Hi {}, your order has been updated", escape(&order.customer_name)),
            &body,
            shop_url,
            "Visit the shop",
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OrderItem, OrderStatus, RequestStatus};

    fn order() -> Order {
        Order {
            id: Some("order:abcdef123456".parse().unwrap()),
            customer_name: "Jane <script>".into(),
            phone: "0712345678".into(),
            email: Some("jane@example.com".into()),
            delivery_location: "Westlands".into(),
            items: vec![OrderItem {
                cake: "cake:a".into(),
                quantity: 2,
                price: 2500.0,
            }],
            total_amount: 12500.5,
            message: Some("Happy birthday".into()),
            special_instructions: None,
            status: OrderStatus::Ready,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_new_order_email() {
        let email = new_order(&order(), "staff@bakery.local", "http://admin/");
        assert_eq!(email.to, "staff@bakery.local");
        assert_eq!(email.subject, "🎂 New Order Received - #123456");
        assert!(email.html.contains("KSh 12,500.50"));
        assert!(email.html.contains("Jane &lt;script&gt;"));
        assert!(email.html.contains("http://admin/admin/orders"));
        assert!(email.html.contains("Happy birthday"));
    }

    #[test]
    fn test_custom_request_email_without_images() {
        let request = CustomCakeRequest {
            id: None,
            customer_name: "Amy".into(),
            phone: "0700".into(),
            email: None,
            occasion: "Wedding".into(),
            cake_size: "x-large".into(),
            flavor: "vanilla".into(),
            icing: "fondant".into(),
            color: None,
            design_description: "Three tiers".into(),
            message: None,
            budget: Some(15000.0),
            delivery_date: None,
            delivery_location: None,
            special_instructions: None,
            reference_images: vec![],
            status: RequestStatus::Pending,
            admin_notes: None,
            quote_amount: None,
            created_at: 0,
            updated_at: 0,
        };
        let email = custom_request(&request, "staff@bakery.local", "http://admin");
        assert_eq!(email.subject, "🎨 New Custom Cake Request - Wedding");
        assert!(email.html.contains("No images provided"));
        assert!(email.html.contains("KSh 15,000"));
        assert!(email.html.contains("x-large"));
    }

    #[test]
    fn test_status_email_requires_customer_email() {
        let mut o = order();
        let email = order_status_changed(&o, "http://shop").unwrap();
        assert_eq!(email.to, "jane@example.com");
        assert_eq!(email.subject, "Your order #123456 is now ready");

        o.email = Some("  ".into());
        assert!(order_status_changed(&o, "http://shop").is_none());
    }
}
