//! Form models validated before any network call
//!
//! Each form checks its fields with [`common::validation`] and, when valid,
//! produces the API payload. Failures come back per field.

use chrono::NaiveDate;
use common::error::{ValidationErrors, ValidationResult};
use common::models::{
    AttendanceStatus, BankAccount, LoginCredentials, NewWedding, NewWish, RsvpResponse,
    UpdateGuest,
};
use common::validation::{
    MAX_WISH_LENGTH, slugify, validate_account_number, validate_email, validate_party_size,
    validate_password, validate_phone, validate_required, validate_slug,
};
use uuid::Uuid;

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> ValidationResult<LoginCredentials> {
        let email = self.email.trim();

        let mut errors = ValidationErrors::new();
        errors.check("email", validate_email(email));
        errors.check("password", validate_password(&self.password));
        errors.into_result()?;

        Ok(LoginCredentials {
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct WeddingForm {
    pub title: String,
    /// Derived from the title when left empty
    pub slug: Option<String>,
    pub date: Option<NaiveDate>,
}

impl WeddingForm {
    pub fn validate(&self) -> ValidationResult<NewWedding> {
        let slug = non_empty(&self.slug).unwrap_or_else(|| slugify(&self.title));

        let mut errors = ValidationErrors::new();
        errors.check("title", validate_required("Title", &self.title, 120));
        errors.check("slug", validate_slug(&slug));
        errors.into_result()?;

        Ok(NewWedding {
            title: self.title.trim().to_string(),
            slug,
            date: self.date,
        })
    }
}

#[derive(Debug, Clone)]
pub struct GuestForm {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub party_size: u32,
    pub status: AttendanceStatus,
}

impl Default for GuestForm {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: None,
            phone: None,
            party_size: 1,
            status: AttendanceStatus::Pending,
        }
    }
}

impl GuestForm {
    /// Complete detail patch for a new or existing guest
    pub fn validate(&self) -> ValidationResult<UpdateGuest> {
        let email = non_empty(&self.email);
        let phone = non_empty(&self.phone);

        let mut errors = ValidationErrors::new();
        errors.check("full_name", validate_required("Full name", &self.full_name, 100));
        if let Some(email) = &email {
            errors.check("email", validate_email(email));
        }
        if let Some(phone) = &phone {
            errors.check("phone", validate_phone(phone));
        }
        errors.check("party_size", validate_party_size(self.party_size));
        errors.into_result()?;

        Ok(UpdateGuest {
            full_name: Some(self.full_name.trim().to_string()),
            email,
            phone,
            party_size: Some(self.party_size),
            status: Some(self.status),
            message: None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RsvpForm {
    pub status: AttendanceStatus,
    pub party_size: u32,
    pub message: Option<String>,
}

impl RsvpForm {
    pub fn validate(&self) -> ValidationResult<RsvpResponse> {
        let message = non_empty(&self.message);

        let mut errors = ValidationErrors::new();
        if self.status == AttendanceStatus::Pending {
            errors.add("status", "Please choose whether you will attend");
        }
        if self.status == AttendanceStatus::Confirmed {
            errors.check("party_size", validate_party_size(self.party_size));
        }
        if let Some(message) = &message {
            errors.check("message", validate_required("Message", message, MAX_WISH_LENGTH));
        }
        errors.into_result()?;

        Ok(RsvpResponse {
            status: self.status,
            party_size: self.party_size.max(1),
            message,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct WishForm {
    pub guest_name: String,
    pub message: String,
}

impl WishForm {
    pub fn validate(&self) -> ValidationResult<NewWish> {
        let mut errors = ValidationErrors::new();
        errors.check("guest_name", validate_required("Name", &self.guest_name, 100));
        errors.check("message", validate_required("Message", &self.message, MAX_WISH_LENGTH));
        errors.into_result()?;

        Ok(NewWish {
            guest_name: self.guest_name.trim().to_string(),
            message: self.message.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct BankAccountForm {
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
}

impl BankAccountForm {
    /// Bank accounts are nested in the wedding, so the client assigns the id
    pub fn validate(&self) -> ValidationResult<BankAccount> {
        let mut errors = ValidationErrors::new();
        errors.check("bank_name", validate_required("Bank name", &self.bank_name, 80));
        errors.check("account_number", validate_account_number(&self.account_number));
        errors.check(
            "account_holder",
            validate_required("Account holder", &self.account_holder, 100),
        );
        errors.into_result()?;

        Ok(BankAccount {
            id: Uuid::new_v4(),
            bank_name: self.bank_name.trim().to_string(),
            account_number: self.account_number.trim().to_string(),
            account_holder: self.account_holder.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_form() {
        let form = LoginForm {
            email: " user@wedding.com ".to_string(),
            password: "123456".to_string(),
        };
        let credentials = form.validate().expect("valid form");
        assert_eq!(credentials.email, "user@wedding.com");

        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));
    }

    #[test]
    fn test_wedding_form_derives_slug() {
        let form = WeddingForm {
            title: "Anna & Ben".to_string(),
            slug: Some("  ".to_string()),
            date: None,
        };
        assert_eq!(form.validate().expect("valid form").slug, "anna-and-ben");

        let form = WeddingForm {
            title: "Anna & Ben".to_string(),
            slug: Some("Bad Slug".to_string()),
            date: None,
        };
        assert!(form.validate().unwrap_err().get("slug").is_some());
    }

    #[test]
    fn test_guest_form() {
        let form = GuestForm {
            full_name: "Rina Putri".to_string(),
            email: Some(String::new()),
            phone: Some("+62 812 3456 7890".to_string()),
            party_size: 2,
            ..GuestForm::default()
        };
        let patch = form.validate().expect("valid form");
        assert_eq!(patch.email, None);
        assert_eq!(patch.party_size, Some(2));

        let form = GuestForm {
            party_size: 0,
            ..GuestForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.field_names(), vec!["full_name", "party_size"]);
    }

    #[test]
    fn test_rsvp_form_requires_choice() {
        let form = RsvpForm {
            status: AttendanceStatus::Pending,
            party_size: 1,
            message: None,
        };
        assert!(form.validate().unwrap_err().get("status").is_some());

        let form = RsvpForm {
            status: AttendanceStatus::Declined,
            party_size: 0,
            message: Some("Sorry!".to_string()),
        };
        assert_eq!(form.validate().expect("valid form").party_size, 1);
    }

    #[test]
    fn test_wish_and_bank_account_forms() {
        assert!(WishForm::default().validate().is_err());

        let account = BankAccountForm {
            bank_name: "BCA".to_string(),
            account_number: "1234 5678 90".to_string(),
            account_holder: "Anna".to_string(),
        }
        .validate()
        .expect("valid form");
        assert_eq!(account.account_number, "1234 5678 90");
    }
}
