use std::borrow::Cow;

use serde::Deserialize;

use crate::models::{field_spec::FieldSpec, payload::SubmissionPayload};

const BASIC_INFORMATION_FIELDS: &[&str] = &[
    "fullName",
    "dob",
    "stateOfOrigin",
    "residentialAddress",
    "permanentHomeAddress",
    "mobile",
    "landline",
    "email",
    "idCard",
    "spouse",
    "pension",
    "nhf",
    "taxNumber",
    "position",
    "location",
    "dateOfResumption",
    "medicalCondition",
    "conviction",
    "previousEmployment",
    "dateOfDisengagement",
    "nextOfKinName",
    "nextOfKinAddress",
    "nextOfKinPhone",
    "nextOfKinOccupation",
    "nextOfKinDesignation",
    "nextOfKinRelationship",
    "nextOfKinOfficeAddress",
    "childrenCount",
    "institution",
    "registryAddress",
    "attestationName",
    "signature",
    "date",
    "comments",
    "hcName",
    "hcSignature",
];

const ATTESTATION_FIELDS: &[&str] = &[
    "fullName",
    "dob",
    "institution",
    "Registryaddress",
    "attestationName",
    "signature",
    "date",
    "comments",
    "hcName",
    "hcSignature",
];

const REFEREE_COUNT: usize = 3;
const CHILD_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    #[default]
    BasicInformation,
    Attestation,
    Dynamic,
}

impl FormKind {
    pub fn as_str(&self) -> &str {
        match self {
            FormKind::BasicInformation => "basic_information",
            FormKind::Attestation => "attestation",
            FormKind::Dynamic => "dynamic",
        }
    }
}

#[derive(Debug, Clone)]
enum Fields {
    Fixed(FieldSpec),
    FromPayload,
}

/// A document title plus the fields rendered under it.
#[derive(Debug, Clone)]
pub struct FormLayout {
    title: String,
    fields: Fields,
}

impl FormLayout {
    pub fn new(title: impl Into<String>, field_spec: FieldSpec) -> Self {
        Self {
            title: title.into(),
            fields: Fields::Fixed(field_spec),
        }
    }

    /// Layout whose fields follow the payload's own key order.
    pub fn dynamic(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Fields::FromPayload,
        }
    }

    pub fn for_kind(kind: FormKind) -> Self {
        match kind {
            FormKind::BasicInformation => Self::basic_information(),
            FormKind::Attestation => Self::attestation(),
            FormKind::Dynamic => Self::dynamic("Form Submission"),
        }
    }

    pub fn basic_information() -> Self {
        let mut keys: Vec<String> = BASIC_INFORMATION_FIELDS
            .iter()
            .map(|key| key.to_string())
            .collect();

        for i in 1..=REFEREE_COUNT {
            keys.push(format!("referee{}Name", i));
            keys.push(format!("referee{}Address", i));
        }

        for i in 1..=CHILD_COUNT {
            keys.push(format!("child{}Name", i));
            keys.push(format!("child{}Age", i));
        }

        Self::new(
            "Basic Information, Referee, and Certificate Verification Form",
            FieldSpec::from_keys(keys),
        )
    }

    pub fn attestation() -> Self {
        Self::new("Attestation Form", FieldSpec::from_keys(ATTESTATION_FIELDS))
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The fixed field spec, or one built from `payload` for dynamic layouts.
    pub fn field_spec(&self, payload: &SubmissionPayload) -> Cow<'_, FieldSpec> {
        match &self.fields {
            Fields::Fixed(spec) => Cow::Borrowed(spec),
            Fields::FromPayload => Cow::Owned(FieldSpec::from_keys(payload.keys())),
        }
    }
}
