use serde_json::{Map, Value};

use super::fields::*;
use super::record::CustomerRecord;
use crate::error::{FieldError, ValidationError};

/// Validates a raw request body into a [`CustomerRecord`].
///
/// Every offending field is reported; nothing is coerced or defaulted.
pub fn validate(raw: &Value) -> Result<CustomerRecord, ValidationError> {
    let Some(object) = raw.as_object() else {
        return Err(ValidationError::single(
            "$",
            "request body must be a JSON object",
        ));
    };

    let mut reader = FieldReader::new(object);

    let gender = reader.category(GENDER, Gender::parse, Gender::DOMAIN);
    let senior_citizen = reader.flag(SENIOR_CITIZEN);
    let partner = reader.category(PARTNER, YesNo::parse, YesNo::DOMAIN);
    let dependents = reader.category(DEPENDENTS, YesNo::parse, YesNo::DOMAIN);
    let tenure = reader.count(TENURE, MAX_TENURE_MONTHS);
    let phone_service = reader.category(PHONE_SERVICE, YesNo::parse, YesNo::DOMAIN);
    let multiple_lines = reader.category(MULTIPLE_LINES, PhoneAddOn::parse, PhoneAddOn::DOMAIN);
    let internet_service = reader.category(
        INTERNET_SERVICE,
        InternetService::parse,
        InternetService::DOMAIN,
    );
    let online_security = reader.add_on(ONLINE_SECURITY);
    let online_backup = reader.add_on(ONLINE_BACKUP);
    let device_protection = reader.add_on(DEVICE_PROTECTION);
    let tech_support = reader.add_on(TECH_SUPPORT);
    let streaming_tv = reader.add_on(STREAMING_TV);
    let streaming_movies = reader.add_on(STREAMING_MOVIES);
    let contract = reader.category(CONTRACT, Contract::parse, Contract::DOMAIN);
    let paperless_billing = reader.category(PAPERLESS_BILLING, YesNo::parse, YesNo::DOMAIN);
    let payment_method = reader.category(PAYMENT_METHOD, PaymentMethod::parse, PaymentMethod::DOMAIN);
    let monthly_charges = reader.amount(MONTHLY_CHARGES);
    let total_charges = reader.amount(TOTAL_CHARGES);

    let errors = reader.finish();
    if !errors.is_empty() {
        return Err(ValidationError { errors });
    }

    let record = (|| {
        Some(CustomerRecord {
            gender: gender?,
            senior_citizen: senior_citizen?,
            partner: partner?,
            dependents: dependents?,
            tenure: tenure?,
            phone_service: phone_service?,
            multiple_lines: multiple_lines?,
            internet_service: internet_service?,
            online_security: online_security?,
            online_backup: online_backup?,
            device_protection: device_protection?,
            tech_support: tech_support?,
            streaming_tv: streaming_tv?,
            streaming_movies: streaming_movies?,
            contract: contract?,
            paperless_billing: paperless_billing?,
            payment_method: payment_method?,
            monthly_charges: monthly_charges?,
            total_charges: total_charges?,
        })
    })();

    // Every reader method records an error whenever it returns None.
    record.ok_or_else(|| ValidationError::single("$", "request could not be validated"))
}

struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    fn new(object: &'a Map<String, Value>) -> Self {
        Self {
            object,
            errors: Vec::new(),
        }
    }

    fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    fn required(&mut self, field: &str) -> Option<&'a Value> {
        let object = self.object;
        match object.get(field) {
            Some(Value::Null) | None => {
                self.reject(field, "field is required");
                None
            }
            Some(value) => Some(value),
        }
    }

    fn category<T>(
        &mut self,
        field: &str,
        parse: fn(&str) -> Option<T>,
        domain: &[&str],
    ) -> Option<T> {
        let value = self.required(field)?;
        let Some(text) = value.as_str() else {
            self.reject(field, "expected a string");
            return None;
        };
        let parsed = parse(text);
        if parsed.is_none() {
            let allowed = domain
                .iter()
                .map(|d| format!("\"{d}\""))
                .collect::<Vec<_>>()
                .join(", ");
            self.reject(field, format!("must be one of: {allowed}"));
        }
        parsed
    }

    fn add_on(&mut self, field: &str) -> Option<InternetAddOn> {
        self.category(field, InternetAddOn::parse, InternetAddOn::DOMAIN)
    }

    fn integer(&mut self, field: &str) -> Option<(&'a Value, Option<u64>)> {
        let value = self.required(field)?;
        if !value.is_number() {
            self.reject(field, "expected an integer");
            return None;
        }
        Some((value, value.as_u64()))
    }

    fn flag(&mut self, field: &str) -> Option<bool> {
        let (_, int) = self.integer(field)?;
        match int {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => {
                self.reject(field, "must be 0 or 1");
                None
            }
        }
    }

    fn count(&mut self, field: &str, max: u64) -> Option<u32> {
        let (value, int) = self.integer(field)?;
        match int {
            Some(n) if n <= max => u32::try_from(n).ok(),
            Some(_) => {
                self.reject(field, format!("must not exceed {max}"));
                None
            }
            None if value.is_i64() => {
                self.reject(field, "must be non-negative");
                None
            }
            None => {
                self.reject(field, "expected an integer");
                None
            }
        }
    }

    fn amount(&mut self, field: &str) -> Option<f64> {
        let value = self.required(field)?;
        let Some(number) = value.as_f64() else {
            self.reject(field, "expected a number");
            return None;
        };
        if !number.is_finite() {
            self.reject(field, "must be finite");
            return None;
        }
        if number < 0.0 {
            self.reject(field, "must be non-negative");
            return None;
        }
        Some(number)
    }

    /// Flags fields outside the schema and returns every collected error.
    fn finish(mut self) -> Vec<FieldError> {
        let object = self.object;
        let unknown: Vec<&String> = object
            .keys()
            .filter(|key| field(key.as_str()).is_none())
            .collect();
        for key in unknown {
            self.reject(key, "unknown field");
        }
        self.errors
    }
}
