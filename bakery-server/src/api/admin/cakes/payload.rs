//! Cake payload: 请求体读取与校验

use axum::Json;
use axum::extract::{FromRequest, Multipart, Request};
use shared::models::cake::{DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_PREPARATION_HOURS};
use shared::models::{CakeFlavor, CakeSize};
use shared::money;
use shared::request::CakePayload;

use super::super::parse_category;
use crate::core::ServerState;
use crate::db::models::{Cake, CakeUpdate};
use crate::services::images::ImageUpload;
use crate::utils::multipart::MultipartForm;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// 读取 JSON 或 multipart 请求体
pub async fn read_payload(
    req: Request,
    state: &ServerState,
) -> AppResult<(CakePayload, Vec<ImageUpload>)> {
    let is_multipart = req
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    if is_multipart {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(format!("Invalid multipart request: {}", e)))?;
        let mut form = MultipartForm::read(multipart).await?;
        let payload = from_form(&mut form)?;
        Ok((payload, form.images))
    } else {
        let Json(payload) = Json::<CakePayload>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(format!("Invalid JSON body: {}", e)))?;
        Ok((payload, Vec::new()))
    }
}

fn parse_field<T: std::str::FromStr>(form: &mut MultipartForm, key: &str) -> AppResult<Option<T>> {
    form.take(key)
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| AppError::validation(format!("{} has an invalid value '{}'", key, v)))
        })
        .transpose()
}

/// multipart 文本字段 → CakePayload
fn from_form(form: &mut MultipartForm) -> AppResult<CakePayload> {
    Ok(CakePayload {
        name: form.take("name"),
        description: form.take("description"),
        price: parse_field(form, "price")?,
        category: form.take("category"),
        flavor: form.take("flavor"),
        size: form.take("size"),
        images: None,
        featured: parse_field(form, "featured")?,
        available: parse_field(form, "available")?,
        stock_quantity: parse_field(form, "stockQuantity")?,
        low_stock_threshold: parse_field(form, "lowStockThreshold")?,
        preparation_time: parse_field(form, "preparationTime")?,
    })
}

fn check_price(price: f64) -> AppResult<f64> {
    if !money::is_valid_amount(price) {
        return Err(AppError::with_message(
            ErrorCode::CakeInvalidPrice,
            "price must be a non-negative amount",
        ));
    }
    Ok(price)
}

fn check_non_negative(value: i64, field: &str) -> AppResult<i64> {
    if value < 0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{} must not be negative", field),
        ));
    }
    Ok(value)
}

fn parse_flavor(value: &str) -> AppResult<CakeFlavor> {
    value
        .parse::<CakeFlavor>()
        .map_err(|e| AppError::validation(e.to_string()).with_detail("allowed", e.expected))
}

fn parse_size(value: &str) -> AppResult<CakeSize> {
    value
        .parse::<CakeSize>()
        .map_err(|e| AppError::validation(e.to_string()).with_detail("allowed", e.expected))
}

fn check_images(images: &[String]) -> AppResult<()> {
    if images.iter().any(|url| url.trim().is_empty() || url.len() > MAX_URL_LEN) {
        return Err(AppError::validation("images must be non-empty URLs"));
    }
    Ok(())
}

/// 创建: name / description / price / category / flavor 必填
pub fn build_cake(payload: CakePayload) -> AppResult<Cake> {
    let name = payload.name.unwrap_or_default();
    let description = payload.description.unwrap_or_default();
    validate_required_text(&name, "name", MAX_NAME_LEN)?;
    validate_required_text(&description, "description", MAX_NOTE_LEN)?;

    let price = payload.price.ok_or_else(|| AppError::required("price"))?;
    let category = payload
        .category
        .as_deref()
        .ok_or_else(|| AppError::required("category"))?;
    let flavor = payload
        .flavor
        .as_deref()
        .ok_or_else(|| AppError::required("flavor"))?;

    let images = payload.images.unwrap_or_default();
    check_images(&images)?;

    Ok(Cake {
        id: None,
        name: name.trim().to_string(),
        description: description.trim().to_string(),
        price: check_price(price)?,
        category: parse_category(category)?,
        flavor: parse_flavor(flavor)?,
        size: payload
            .size
            .as_deref()
            .map(parse_size)
            .transpose()?
            .unwrap_or_default(),
        images,
        featured: payload.featured.unwrap_or(false),
        available: payload.available.unwrap_or(true),
        stock_quantity: check_non_negative(payload.stock_quantity.unwrap_or(0), "stockQuantity")?,
        low_stock_threshold: check_non_negative(
            payload
                .low_stock_threshold
                .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD),
            "lowStockThreshold",
        )?,
        preparation_time: check_non_negative(
            payload.preparation_time.unwrap_or(DEFAULT_PREPARATION_HOURS),
            "preparationTime",
        )?,
        created_at: 0,
        updated_at: 0,
    })
}

/// 更新: 只校验并写入出现的字段
pub fn build_update(payload: CakePayload) -> AppResult<CakeUpdate> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(description) = &payload.description {
        validate_required_text(description, "description", MAX_NOTE_LEN)?;
    }
    if let Some(images) = &payload.images {
        check_images(images)?;
    }

    Ok(CakeUpdate {
        name: payload.name.map(|n| n.trim().to_string()),
        description: payload.description.map(|d| d.trim().to_string()),
        price: payload.price.map(check_price).transpose()?,
        category: payload.category.as_deref().map(parse_category).transpose()?,
        flavor: payload.flavor.as_deref().map(parse_flavor).transpose()?,
        size: payload.size.as_deref().map(parse_size).transpose()?,
        images: payload.images,
        featured: payload.featured,
        available: payload.available,
        stock_quantity: payload
            .stock_quantity
            .map(|v| check_non_negative(v, "stockQuantity"))
            .transpose()?,
        low_stock_threshold: payload
            .low_stock_threshold
            .map(|v| check_non_negative(v, "lowStockThreshold"))
            .transpose()?,
        preparation_time: payload
            .preparation_time
            .map(|v| check_non_negative(v, "preparationTime"))
            .transpose()?,
        updated_at: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::CakeCategory;

    fn payload() -> CakePayload {
        CakePayload {
            name: Some(" Red Velvet Dream ".into()),
            description: Some("Layers of red velvet".into()),
            price: Some(2500.0),
            category: Some("birthday".into()),
            flavor: Some("red-velvet".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_cake_applies_defaults() {
        let cake = build_cake(payload()).unwrap();
        assert_eq!(cake.name, "Red Velvet Dream");
        assert_eq!(cake.category, CakeCategory::Birthday);
        assert_eq!(cake.flavor, CakeFlavor::RedVelvet);
        assert_eq!(cake.size, CakeSize::Medium);
        assert!(cake.available);
        assert!(!cake.featured);
        assert_eq!(cake.stock_quantity, 0);
        assert_eq!(cake.low_stock_threshold, DEFAULT_LOW_STOCK_THRESHOLD);
        assert_eq!(cake.preparation_time, DEFAULT_PREPARATION_HOURS);
    }

    #[test]
    fn test_build_cake_requires_fields() {
        let mut p = payload();
        p.flavor = None;
        assert_eq!(build_cake(p).unwrap_err().code, ErrorCode::RequiredField);

        let mut p = payload();
        p.price = Some(-1.0);
        assert_eq!(build_cake(p).unwrap_err().code, ErrorCode::CakeInvalidPrice);

        let mut p = payload();
        p.category = Some("bread".into());
        assert_eq!(
            build_cake(p).unwrap_err().code,
            ErrorCode::CakeCategoryInvalid
        );
    }

    #[test]
    fn test_build_update_only_sets_present_fields() {
        let update = build_update(CakePayload {
            price: Some(3000.0),
            featured: Some(true),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(update.price, Some(3000.0));
        assert_eq!(update.featured, Some(true));
        assert!(update.name.is_none());
        assert!(update.category.is_none());

        let err = build_update(CakePayload {
            stock_quantity: Some(-3),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_multipart_fields_are_parsed() {
        let mut form = MultipartForm::default();
        form.fields.insert("name".into(), "Lemon Drizzle".into());
        form.fields.insert("price".into(), "1800".into());
        form.fields.insert("featured".into(), "true".into());
        form.fields.insert("stockQuantity".into(), "12".into());
        let p = from_form(&mut form).unwrap();
        assert_eq!(p.price, Some(1800.0));
        assert_eq!(p.featured, Some(true));
        assert_eq!(p.stock_quantity, Some(12));

        let mut form = MultipartForm::default();
        form.fields.insert("price".into(), "cheap".into());
        assert!(from_form(&mut form).is_err());
    }
}
