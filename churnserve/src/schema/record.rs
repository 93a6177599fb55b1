use super::fields::*;

/// A raw feature value as handed to the model artifact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Category(&'static str),
    Number(f64),
}

/// A request that passed schema validation.
///
/// Only [`validate`](super::validate) builds one, so holding a
/// `CustomerRecord` means every field is present and inside its domain.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRecord {
    pub(super) gender: Gender,
    pub(super) senior_citizen: bool,
    pub(super) partner: YesNo,
    pub(super) dependents: YesNo,
    pub(super) tenure: u32,
    pub(super) phone_service: YesNo,
    pub(super) multiple_lines: PhoneAddOn,
    pub(super) internet_service: InternetService,
    pub(super) online_security: InternetAddOn,
    pub(super) online_backup: InternetAddOn,
    pub(super) device_protection: InternetAddOn,
    pub(super) tech_support: InternetAddOn,
    pub(super) streaming_tv: InternetAddOn,
    pub(super) streaming_movies: InternetAddOn,
    pub(super) contract: Contract,
    pub(super) paperless_billing: YesNo,
    pub(super) payment_method: PaymentMethod,
    pub(super) monthly_charges: f64,
    pub(super) total_charges: f64,
}

impl CustomerRecord {
    pub fn tenure(&self) -> u32 {
        self.tenure
    }

    pub fn contract(&self) -> Contract {
        self.contract
    }

    pub fn internet_service(&self) -> InternetService {
        self.internet_service
    }

    /// Reads a field by its wire name.
    pub fn feature(&self, name: &str) -> Option<FeatureValue> {
        use FeatureValue::{Category, Number};

        let value = match name {
            GENDER => Category(self.gender.as_str()),
            SENIOR_CITIZEN => Number(if self.senior_citizen { 1.0 } else { 0.0 }),
            PARTNER => Category(self.partner.as_str()),
            DEPENDENTS => Category(self.dependents.as_str()),
            TENURE => Number(f64::from(self.tenure)),
            PHONE_SERVICE => Category(self.phone_service.as_str()),
            MULTIPLE_LINES => Category(self.multiple_lines.as_str()),
            INTERNET_SERVICE => Category(self.internet_service.as_str()),
            ONLINE_SECURITY => Category(self.online_security.as_str()),
            ONLINE_BACKUP => Category(self.online_backup.as_str()),
            DEVICE_PROTECTION => Category(self.device_protection.as_str()),
            TECH_SUPPORT => Category(self.tech_support.as_str()),
            STREAMING_TV => Category(self.streaming_tv.as_str()),
            STREAMING_MOVIES => Category(self.streaming_movies.as_str()),
            CONTRACT => Category(self.contract.as_str()),
            PAPERLESS_BILLING => Category(self.paperless_billing.as_str()),
            PAYMENT_METHOD => Category(self.payment_method.as_str()),
            MONTHLY_CHARGES => Number(self.monthly_charges),
            TOTAL_CHARGES => Number(self.total_charges),
            _ => return None,
        };
        Some(value)
    }
}
