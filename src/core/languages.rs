use super::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

/// Languages offered in the role selectors. Names double as the values
/// sent to the translate function.
pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language {
        code: "en",
        name: "English",
    },
    Language {
        code: "hi",
        name: "Hindi",
    },
    Language {
        code: "es",
        name: "Spanish",
    },
    Language {
        code: "fr",
        name: "French",
    },
    Language {
        code: "de",
        name: "German",
    },
    Language {
        code: "zh",
        name: "Chinese",
    },
    Language {
        code: "ar",
        name: "Arabic",
    },
    Language {
        code: "pt",
        name: "Portuguese",
    },
    Language {
        code: "bn",
        name: "Bengali",
    },
    Language {
        code: "ta",
        name: "Tamil",
    },
];

pub const DEFAULT_DOCTOR_LANGUAGE: &str = "English";
pub const DEFAULT_PATIENT_LANGUAGE: &str = "Hindi";

/// Looks a language up by English name or code, ignoring case.
#[must_use]
pub fn find_language(name_or_code: &str) -> Option<&'static Language> {
    let needle = name_or_code.trim();
    SUPPORTED_LANGUAGES.iter().find(|lang| {
        lang.name.eq_ignore_ascii_case(needle) || lang.code.eq_ignore_ascii_case(needle)
    })
}

/// `(source, target)` for a message authored by `author`.
#[must_use]
pub fn language_pair<'a>(
    author: Role,
    doctor_language: &'a str,
    patient_language: &'a str,
) -> (&'a str, &'a str) {
    match author {
        Role::Doctor => (doctor_language, patient_language),
        Role::Patient => (patient_language, doctor_language),
    }
}
