//! The fixed field catalogue of the request schema.
//!
//! Wire names match the columns the churn pipeline was fitted on, so they
//! keep the dataset's original casing.

pub const GENDER: &str = "gender";
pub const SENIOR_CITIZEN: &str = "SeniorCitizen";
pub const PARTNER: &str = "Partner";
pub const DEPENDENTS: &str = "Dependents";
pub const TENURE: &str = "tenure";
pub const PHONE_SERVICE: &str = "PhoneService";
pub const MULTIPLE_LINES: &str = "MultipleLines";
pub const INTERNET_SERVICE: &str = "InternetService";
pub const ONLINE_SECURITY: &str = "OnlineSecurity";
pub const ONLINE_BACKUP: &str = "OnlineBackup";
pub const DEVICE_PROTECTION: &str = "DeviceProtection";
pub const TECH_SUPPORT: &str = "TechSupport";
pub const STREAMING_TV: &str = "StreamingTV";
pub const STREAMING_MOVIES: &str = "StreamingMovies";
pub const CONTRACT: &str = "Contract";
pub const PAPERLESS_BILLING: &str = "PaperlessBilling";
pub const PAYMENT_METHOD: &str = "PaymentMethod";
pub const MONTHLY_CHARGES: &str = "MonthlyCharges";
pub const TOTAL_CHARGES: &str = "TotalCharges";

/// Upper bound on tenure, in months.
pub const MAX_TENURE_MONTHS: u64 = 10_000;

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every accepted wire value, in declaration order.
            pub const DOMAIN: &'static [&'static str] = &[$($wire),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($wire => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

wire_enum!(Gender {
    Male => "Male",
    Female => "Female",
});

wire_enum!(
    /// Binary indicator encoded as `"Yes"` / `"No"`.
    YesNo {
        Yes => "Yes",
        No => "No",
    }
);

wire_enum!(
    /// Add-on that only applies when the customer has phone service.
    PhoneAddOn {
        Yes => "Yes",
        No => "No",
        NoPhoneService => "No phone service",
    }
);

wire_enum!(InternetService {
    Dsl => "DSL",
    FiberOptic => "Fiber optic",
    No => "No",
});

wire_enum!(
    /// Add-on that only applies when the customer has internet service.
    InternetAddOn {
        Yes => "Yes",
        No => "No",
        NoInternetService => "No internet service",
    }
);

wire_enum!(Contract {
    MonthToMonth => "Month-to-month",
    OneYear => "One year",
    TwoYear => "Two year",
});

wire_enum!(PaymentMethod {
    ElectronicCheck => "Electronic check",
    MailedCheck => "Mailed check",
    BankTransfer => "Bank transfer (automatic)",
    CreditCard => "Credit card (automatic)",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// String drawn from a closed domain.
    Categorical(&'static [&'static str]),
    /// Integer indicator, `0` or `1`.
    Flag,
    /// Non-negative integer bounded by `max`.
    Count { max: u64 },
    /// Finite non-negative number.
    Amount,
}

impl FieldKind {
    pub fn is_numeric(self) -> bool {
        !matches!(self, FieldKind::Categorical(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn categorical(name: &'static str, domain: &'static [&'static str]) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Categorical(domain),
    }
}

/// Every request field, in wire order. All are required.
pub const FIELDS: &[FieldSpec] = &[
    categorical(GENDER, Gender::DOMAIN),
    FieldSpec {
        name: SENIOR_CITIZEN,
        kind: FieldKind::Flag,
    },
    categorical(PARTNER, YesNo::DOMAIN),
    categorical(DEPENDENTS, YesNo::DOMAIN),
    FieldSpec {
        name: TENURE,
        kind: FieldKind::Count {
            max: MAX_TENURE_MONTHS,
        },
    },
    categorical(PHONE_SERVICE, YesNo::DOMAIN),
    categorical(MULTIPLE_LINES, PhoneAddOn::DOMAIN),
    categorical(INTERNET_SERVICE, InternetService::DOMAIN),
    categorical(ONLINE_SECURITY, InternetAddOn::DOMAIN),
    categorical(ONLINE_BACKUP, InternetAddOn::DOMAIN),
    categorical(DEVICE_PROTECTION, InternetAddOn::DOMAIN),
    categorical(TECH_SUPPORT, InternetAddOn::DOMAIN),
    categorical(STREAMING_TV, InternetAddOn::DOMAIN),
    categorical(STREAMING_MOVIES, InternetAddOn::DOMAIN),
    categorical(CONTRACT, Contract::DOMAIN),
    categorical(PAPERLESS_BILLING, YesNo::DOMAIN),
    categorical(PAYMENT_METHOD, PaymentMethod::DOMAIN),
    FieldSpec {
        name: MONTHLY_CHARGES,
        kind: FieldKind::Amount,
    },
    FieldSpec {
        name: TOTAL_CHARGES,
        kind: FieldKind::Amount,
    },
];

pub fn field(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_names_are_unique() {
        let names: HashSet<_> = FIELDS.iter().map(|f| f.name).collect();
        assert_eq!(names.len(), FIELDS.len());
        assert_eq!(FIELDS.len(), 19);
    }

    #[test]
    fn test_wire_enum_parse_matches_domain() {
        for value in Contract::DOMAIN {
            let parsed = Contract::parse(value).unwrap();
            assert_eq!(parsed.as_str(), *value);
        }
        assert_eq!(Contract::parse("month-to-month"), None);
        assert_eq!(
            InternetAddOn::parse("No internet service"),
            Some(InternetAddOn::NoInternetService)
        );
    }

    #[test]
    fn test_field_lookup() {
        assert_eq!(field(TENURE).unwrap().kind, FieldKind::Count { max: 10_000 });
        assert!(field("Churn").is_none());
        assert!(!field(GENDER).unwrap().kind.is_numeric());
        assert!(field(SENIOR_CITIZEN).unwrap().kind.is_numeric());
    }
}
