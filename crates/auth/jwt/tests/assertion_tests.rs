//! Signing tests against a fixture RSA key pair.

use folio_jwt::*;

const PRIVATE_KEY: &str = include_str!("fixtures/service_account_key.pem");
const PUBLIC_KEY: &str = include_str!("fixtures/service_account_pub.pem");
const OTHER_PUBLIC_KEY: &str = include_str!("fixtures/other_pub.pem");

const SERVICE_EMAIL: &str = "reporter@folio.iam.gserviceaccount.com";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

fn signed_assertion() -> String {
    let signer = AssertionSigner::rs256(PRIVATE_KEY).expect("fixture key should load");
    let claims = AssertionClaims::new(SERVICE_EMAIL, TOKEN_URL, ASSERTION_TTL);
    signer.sign(&claims).expect("should sign")
}

mod signing_tests {
    use super::*;

    #[test]
    fn test_assertion_is_compact_jwt() {
        let token = signed_assertion();
        assert_eq!(token.split('.').count(), 3, "JWT should have 3 parts");
    }

    #[test]
    fn test_header_declares_rs256() {
        let token = signed_assertion();
        let header = jsonwebtoken::decode_header(&token).expect("should decode header");
        assert_eq!(header.alg, jsonwebtoken::Algorithm::RS256);
        assert!(header.kid.is_none());
    }

    #[test]
    fn test_key_id_lands_in_header() {
        let signer = AssertionSigner::rs256(PRIVATE_KEY).unwrap().with_key_id("abc123");
        let token = signer
            .sign(&AssertionClaims::new(SERVICE_EMAIL, TOKEN_URL, ASSERTION_TTL))
            .unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.kid.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_escaped_newlines_in_key_are_accepted() {
        let escaped = PRIVATE_KEY.replace('\n', "\\n");
        assert!(AssertionSigner::rs256(&escaped).is_ok());
    }
}

mod verification_tests {
    use super::*;

    #[test]
    fn test_round_trip_claims() {
        let verifier = AssertionVerifier::rs256(PUBLIC_KEY.as_bytes(), TOKEN_URL).unwrap();
        let claims = verifier.verify(&signed_assertion()).expect("should verify");

        assert_eq!(claims.iss, SERVICE_EMAIL);
        assert_eq!(claims.sub, SERVICE_EMAIL);
        assert_eq!(claims.aud, TOKEN_URL);
        assert_eq!(claims.scope, ANALYTICS_READONLY_SCOPE);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_key_rejected() {
        let verifier = AssertionVerifier::rs256(OTHER_PUBLIC_KEY.as_bytes(), TOKEN_URL).unwrap();
        let result = verifier.verify(&signed_assertion());
        assert!(matches!(result, Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let verifier =
            AssertionVerifier::rs256(PUBLIC_KEY.as_bytes(), "https://elsewhere.test").unwrap();
        let result = verifier.verify(&signed_assertion());
        assert!(matches!(result, Err(JwtError::InvalidAudience)));
    }

    #[test]
    fn test_expired_assertion_rejected() {
        let signer = AssertionSigner::rs256(PRIVATE_KEY).unwrap();
        // Well past the default validation leeway.
        let claims = AssertionClaims::new(SERVICE_EMAIL, TOKEN_URL, chrono::Duration::hours(-2));
        let token = signer.sign(&claims).unwrap();

        let verifier = AssertionVerifier::rs256(PUBLIC_KEY.as_bytes(), TOKEN_URL).unwrap();
        assert!(matches!(verifier.verify(&token), Err(JwtError::Expired)));
    }
}
