//! 定制蛋糕申请流程
//!
//! 文本字段全部校验通过之后才上传参考图; 单张图片失败只跳过该图。

use shared::models::RequestStatus;

use super::{Checkout, PostCommit, SideTask, UploadOutcome};
use crate::db::models::CustomCakeRequest;
use crate::db::repository::CustomRequestRepository;
use crate::services::images::{ImageStore, ImageUpload, MAX_IMAGES_PER_REQUEST};
use crate::services::notification::Notification;
use crate::utils::multipart::MultipartForm;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, parse_optional_amount,
    parse_optional_date, validate_optional_email, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// 定制申请表单 (multipart 文本字段)
#[derive(Debug, Clone, Default)]
pub struct CustomRequestForm {
    pub customer_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub occasion: String,
    pub cake_size: String,
    pub flavor: String,
    pub icing: String,
    pub color: Option<String>,
    pub design_description: String,
    pub message: Option<String>,
    pub budget: Option<String>,
    pub delivery_date: Option<String>,
    pub delivery_location: Option<String>,
    pub special_instructions: Option<String>,
}

impl CustomRequestForm {
    /// 从 multipart 文本字段构造 (字段名为 camelCase)
    pub fn from_multipart(form: &mut MultipartForm) -> Self {
        Self {
            customer_name: form.take("customerName").unwrap_or_default(),
            phone: form.take("phone").unwrap_or_default(),
            email: form.take("email"),
            occasion: form.take("occasion").unwrap_or_default(),
            cake_size: form.take("cakeSize").unwrap_or_default(),
            flavor: form.take("flavor").unwrap_or_default(),
            icing: form.take("icing").unwrap_or_default(),
            color: form.take("color"),
            design_description: form.take("designDescription").unwrap_or_default(),
            message: form.take("message"),
            budget: form.take("budget"),
            delivery_date: form.take("deliveryDate"),
            delivery_location: form.take("deliveryLocation"),
            special_instructions: form.take("specialInstructions"),
        }
    }

    /// 边界校验, 通过后返回待持久化的申请 (referenceImages 为空)
    pub fn validate(&self) -> AppResult<CustomCakeRequest> {
        validate_required_text(&self.customer_name, "customerName", MAX_NAME_LEN)?;
        validate_required_text(&self.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&self.occasion, "occasion", MAX_NAME_LEN)?;
        validate_required_text(&self.cake_size, "cakeSize", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&self.flavor, "flavor", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&self.icing, "icing", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&self.design_description, "designDescription", MAX_NOTE_LEN)?;

        validate_optional_email(&self.email, "email")?;
        validate_optional_text(&self.color, "color", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.message, "message", MAX_NOTE_LEN)?;
        validate_optional_text(&self.budget, "budget", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.delivery_date, "deliveryDate", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.delivery_location, "deliveryLocation", MAX_ADDRESS_LEN)?;
        validate_optional_text(&self.special_instructions, "specialInstructions", MAX_NOTE_LEN)?;

        // 尺寸为自由文本, 只做长度校验
        let budget = parse_optional_amount(&self.budget, "budget")?;
        let delivery_date = parse_optional_date(&self.delivery_date, "deliveryDate")?
            .map(|d| d.format("%Y-%m-%d").to_string());

        Ok(CustomCakeRequest {
            id: None,
            customer_name: self.customer_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.clone(),
            occasion: self.occasion.trim().to_string(),
            cake_size: self.cake_size.trim().to_string(),
            flavor: self.flavor.trim().to_string(),
            icing: self.icing.trim().to_string(),
            color: self.color.clone(),
            design_description: self.design_description.trim().to_string(),
            message: self.message.clone(),
            budget,
            delivery_date,
            delivery_location: self.delivery_location.clone(),
            special_instructions: self.special_instructions.clone(),
            reference_images: Vec::new(),
            status: RequestStatus::Pending,
            admin_notes: None,
            quote_amount: None,
            created_at: 0,
            updated_at: 0,
        })
    }
}

/// 依次上传, 失败的图片记录为 Skipped
pub async fn upload_images(store: &dyn ImageStore, uploads: Vec<ImageUpload>) -> Vec<UploadOutcome> {
    let mut outcomes = Vec::with_capacity(uploads.len());
    for upload in uploads {
        let name = upload.file_name.clone().unwrap_or_default();
        let outcome = match store.store(upload).await {
            Ok(url) => UploadOutcome::Stored(url),
            Err(e) => {
                tracing::warn!(file = %name, error = %e, "Reference image skipped");
                UploadOutcome::Skipped(e.message)
            }
        };
        outcomes.push(outcome);
    }
    outcomes
}

impl Checkout {
    /// 校验 → 上传参考图 → 持久化 → 通知员工
    pub async fn submit_custom_request(
        &self,
        form: CustomRequestForm,
        uploads: Vec<ImageUpload>,
    ) -> AppResult<CustomCakeRequest> {
        if uploads.len() > MAX_IMAGES_PER_REQUEST {
            return Err(AppError::with_message(
                ErrorCode::TooManyImages,
                format!("At most {} images are allowed", MAX_IMAGES_PER_REQUEST),
            ));
        }
        let mut request = form.validate()?;

        let outcomes = upload_images(self.images.as_ref(), uploads).await;
        request.reference_images = outcomes
            .iter()
            .filter_map(|o| o.url().map(str::to_string))
            .collect();

        let request = CustomRequestRepository::new(self.db.clone())
            .create(request)
            .await?;
        tracing::info!(
            request_id = %request.id_string(),
            occasion = %request.occasion,
            images = request.reference_images.len(),
            skipped = outcomes.len() - request.reference_images.len(),
            "Custom cake request submitted"
        );

        PostCommit::new()
            .then(SideTask::NotifyStaff(Notification::CustomRequest(Box::new(
                request.clone(),
            ))))
            .run(&self.notifier);

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::services::images::{LocalImageStore, sample_png};
    use crate::services::notification::NotificationService;
    use std::sync::Arc;

    fn form() -> CustomRequestForm {
        CustomRequestForm {
            customer_name: "Amy".into(),
            phone: "0700111222".into(),
            occasion: "Wedding".into(),
            cake_size: "large".into(),
            flavor: "vanilla".into(),
            icing: "buttercream".into(),
            design_description: "Three tiers with roses".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_multipart_fields_map_to_form() {
        let mut mp = MultipartForm::default();
        mp.fields.insert("customerName".into(), "Amy".into());
        mp.fields.insert("cakeSize".into(), "small".into());
        mp.fields.insert("color".into(), " ".into());
        let form = CustomRequestForm::from_multipart(&mut mp);
        assert_eq!(form.customer_name, "Amy");
        assert_eq!(form.cake_size, "small");
        assert_eq!(form.color, None);
    }

    #[test]
    fn test_missing_design_description_rejected() {
        let mut f = form();
        f.design_description.clear();
        let err = f.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert!(err.message.contains("designDescription"));
    }

    #[test]
    fn test_storefront_sizes_accepted() {
        for size in ["x-large", "Two tier", " small "] {
            let mut f = form();
            f.cake_size = size.into();
            assert_eq!(f.validate().unwrap().cake_size, size.trim());
        }
    }

    #[test]
    fn test_budget_and_date_are_normalized() {
        let mut f = form();
        f.budget = Some(" 15000 ".into());
        f.delivery_date = Some("2026-02-14T10:00:00+03:00".into());
        let request = f.validate().unwrap();
        assert_eq!(request.budget, Some(15000.0));
        assert_eq!(request.delivery_date.as_deref(), Some("2026-02-14"));

        let mut f = form();
        f.budget = Some("".into());
        assert_eq!(f.validate().unwrap().budget, None);
    }

    #[test]
    fn test_malformed_budget_and_date_rejected() {
        let mut f = form();
        f.budget = Some("lots".into());
        let err = f.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.message.contains("budget"));

        let mut f = form();
        f.budget = Some("-500".into());
        assert_eq!(f.validate().unwrap_err().code, ErrorCode::ValueOutOfRange);

        let mut f = form();
        f.delivery_date = Some("next friday".into());
        let err = f.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.message.contains("deliveryDate"));
    }

    async fn checkout() -> (
        Checkout,
        tokio::sync::mpsc::Receiver<Notification>,
        tempfile::TempDir,
    ) {
        let db = DbService::memory().await.unwrap().db;
        let (notifier, rx) = NotificationService::new(4);
        let dir = tempfile::tempdir().unwrap();
        let images = Arc::new(LocalImageStore::new(dir.path(), "http://localhost:5000"));
        (Checkout::new(db, notifier, images), rx, dir)
    }

    #[tokio::test]
    async fn test_invalid_request_persists_and_notifies_nothing() {
        let (checkout, mut rx, dir) = checkout().await;
        let mut f = form();
        f.design_description = "   ".into();
        let upload = ImageUpload {
            file_name: Some("ref.png".into()),
            content_type: Some("image/png".into()),
            data: sample_png(),
        };

        assert!(checkout.submit_custom_request(f, vec![upload]).await.is_err());
        assert_eq!(
            CustomRequestRepository::new(checkout.db.clone())
                .count()
                .await
                .unwrap(),
            0
        );
        assert!(rx.try_recv().is_err());
        // 没有上传任何文件
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_budget_uploads_nothing() {
        let (checkout, mut rx, dir) = checkout().await;
        let mut f = form();
        f.budget = Some("about 10k".into());
        let upload = ImageUpload {
            file_name: Some("ref.png".into()),
            content_type: Some("image/png".into()),
            data: sample_png(),
        };

        let err = checkout
            .submit_custom_request(f, vec![upload])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(
            CustomRequestRepository::new(checkout.db.clone())
                .count()
                .await
                .unwrap(),
            0
        );
        assert!(rx.try_recv().is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_bad_image_is_skipped() {
        let (checkout, mut rx, _dir) = checkout().await;
        let uploads = vec![
            ImageUpload {
                file_name: Some("ref.png".into()),
                content_type: Some("image/png".into()),
                data: sample_png(),
            },
            ImageUpload {
                file_name: Some("broken.png".into()),
                content_type: Some("image/png".into()),
                data: b"not a png".to_vec(),
            },
        ];

        let request = checkout.submit_custom_request(form(), uploads).await.unwrap();
        assert_eq!(request.reference_images.len(), 1);
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(rx.try_recv().unwrap().kind(), "custom_request");
    }

    #[tokio::test]
    async fn test_too_many_images_rejected() {
        let (checkout, _rx, _dir) = checkout().await;
        let uploads = (0..6)
            .map(|_| ImageUpload {
                file_name: Some("ref.png".into()),
                content_type: None,
                data: vec![1],
            })
            .collect();
        let err = checkout
            .submit_custom_request(form(), uploads)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TooManyImages);
    }
}
