use kyc_domain::validators::{
    is_valid_aadhaar_number, is_valid_pan_format, mask_aadhaar, parse_income,
};
use kyc_domain::{
    AadhaarDirectory, CardExtractor, CardKind, FixtureCardExtractor, InMemoryAadhaarDirectory,
    LookupOutcome, OtpVerifier, StaticOtpVerifier,
};

#[test]
fn full_verification_collaborators_work_together() {
    // el mismo titular es visible vía directorio y vía extracción de imagen
    let directory = InMemoryAadhaarDirectory::new();
    let LookupOutcome::Verified(record) = directory.verify("123456789012").unwrap() else {
        panic!("expected a verified record");
    };

    let extractor = FixtureCardExtractor::new();
    let card = extractor
        .extract(CardKind::Passport, "upload://passport.png")
        .unwrap();
    assert_eq!(card.holder_name, record.holder_name);

    let otp = StaticOtpVerifier::default();
    assert!(otp.verify_code("123456789012", "123456").unwrap());
}

#[test]
fn format_validators_gate_raw_input() {
    assert!(is_valid_aadhaar_number("9999 8888 7777"));
    assert!(!is_valid_aadhaar_number("not a number"));
    assert!(is_valid_pan_format("FGHIJ5678K"));
    assert_eq!(parse_income("3,00,000"), Some(300_000));
    assert_eq!(mask_aadhaar("999988887777"), "XXXX XXXX 7777");
}
