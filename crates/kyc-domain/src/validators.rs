//! Validaciones de formato y helpers de presentación.
//!
//! Todas operan sobre el input ya recortado de espacios. Ninguna consulta
//! servicios externos: formato sí, veracidad no.

use chrono::NaiveDate;

use crate::details::{AadhaarDetails, PanDetails};

/// 12 dígitos exactos. Se admiten espacios y guiones como separadores
/// visuales ("1234 5678 9012").
pub fn is_valid_aadhaar_number(raw: &str) -> bool {
    let digits: String = raw.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    digits.len() == 12 && digits.chars().all(|c| c.is_ascii_digit())
}

/// Dígitos del número sin separadores visuales.
pub fn normalize_aadhaar_number(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Código OTP de 6 dígitos.
pub fn is_valid_otp_format(raw: &str) -> bool {
    let t = raw.trim();
    t.len() == 6 && t.chars().all(|c| c.is_ascii_digit())
}

/// PAN: 5 letras, 4 dígitos, 1 letra ("ABCDE1234F"). Se normaliza a
/// mayúsculas antes de validar.
pub fn is_valid_pan_format(raw: &str) -> bool {
    let t = raw.trim().to_uppercase();
    let bytes = t.as_bytes();
    bytes.len() == 10
        && bytes[..5].iter().all(u8::is_ascii_uppercase)
        && bytes[5..9].iter().all(u8::is_ascii_digit)
        && bytes[9].is_ascii_uppercase()
}

/// Fecha DD/MM/YYYY con validación de calendario (rechaza 31/02/2000).
pub fn is_valid_date(raw: &str) -> bool {
    NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y").is_ok()
}

/// Monto anual como entero no negativo en rupias.
pub fn parse_income(raw: &str) -> Option<i64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<i64>().ok().filter(|n| *n >= 0)
}

/// Enmascara todo salvo los últimos 4 dígitos: "XXXX XXXX 9012".
pub fn mask_aadhaar(number: &str) -> String {
    let digits = normalize_aadhaar_number(number);
    let tail = if digits.len() >= 4 {
        &digits[digits.len() - 4..]
    } else {
        digits.as_str()
    };
    format!("XXXX XXXX {tail}")
}

/// Los datos del titular del PAN coinciden con los del Aadhaar verificado.
/// El nombre ignora mayúsculas y espacios de borde; la fecha compara exacta.
pub fn holder_data_matches(pan: &PanDetails, aadhaar: &AadhaarDetails) -> bool {
    pan.holder_name
        .trim()
        .eq_ignore_ascii_case(aadhaar.holder_name.trim())
        && pan.dob.trim() == aadhaar.dob.trim()
}

/// Respuesta afirmativa de confirmación.
pub fn is_affirmative(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "yes" | "y" | "yeah" | "yep" | "correct" | "confirm" | "ok" | "okay" | "sure"
    )
}

/// Respuesta negativa de confirmación.
pub fn is_negative(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "no" | "n" | "nope" | "wrong" | "incorrect"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aadhaar_number_format() {
        assert!(is_valid_aadhaar_number("123456789012"));
        assert!(is_valid_aadhaar_number("1234 5678 9012"));
        assert!(is_valid_aadhaar_number("1234-5678-9012"));
        assert!(!is_valid_aadhaar_number("12345678901"));
        assert!(!is_valid_aadhaar_number("12345678901a"));
        assert!(!is_valid_aadhaar_number(""));
    }

    #[test]
    fn otp_format() {
        assert!(is_valid_otp_format("123456"));
        assert!(is_valid_otp_format(" 123456 "));
        assert!(!is_valid_otp_format("12345"));
        assert!(!is_valid_otp_format("12345a"));
    }

    #[test]
    fn pan_format() {
        assert!(is_valid_pan_format("ABCDE1234F"));
        assert!(is_valid_pan_format("abcde1234f"));
        assert!(!is_valid_pan_format("ABCDE12345"));
        assert!(!is_valid_pan_format("AB1DE1234F"));
        assert!(!is_valid_pan_format("ABCDE1234FX"));
    }

    #[test]
    fn date_format_checks_the_calendar() {
        assert!(is_valid_date("01/01/1990"));
        assert!(is_valid_date("29/02/2020"));
        assert!(!is_valid_date("31/02/2000"));
        assert!(!is_valid_date("1990/01/01"));
        assert!(!is_valid_date("yesterday"));
    }

    #[test]
    fn income_parsing() {
        assert_eq!(parse_income("250000"), Some(250_000));
        assert_eq!(parse_income("2,50,000"), Some(250_000));
        assert_eq!(parse_income("-5"), None);
        assert_eq!(parse_income("a lot"), None);
    }

    #[test]
    fn masking_keeps_last_four() {
        assert_eq!(mask_aadhaar("123456789012"), "XXXX XXXX 9012");
        assert_eq!(mask_aadhaar("1234 5678 9012"), "XXXX XXXX 9012");
    }

    #[test]
    fn holder_comparison_ignores_case_but_not_content() {
        let aadhaar = AadhaarDetails {
            aadhaar_number: "123456789012".to_string(),
            holder_name: "Ananya Sharma".to_string(),
            dob: "01/01/1990".to_string(),
            address: "221 Green Park, New Delhi".to_string(),
        };
        let mut pan = PanDetails {
            pan_number: "ABCDE1234F".to_string(),
            holder_name: " ananya sharma ".to_string(),
            dob: "01/01/1990".to_string(),
        };
        assert!(holder_data_matches(&pan, &aadhaar));

        pan.holder_name = "Rohan Gupta".to_string();
        assert!(!holder_data_matches(&pan, &aadhaar));

        pan.holder_name = "Ananya Sharma".to_string();
        pan.dob = "02/01/1990".to_string();
        assert!(!holder_data_matches(&pan, &aadhaar));
    }

    #[test]
    fn yes_no_parsing() {
        assert!(is_affirmative("Yes"));
        assert!(is_affirmative(" ok "));
        assert!(is_negative("No"));
        assert!(!is_affirmative("maybe"));
        assert!(!is_negative("maybe"));
    }
}
