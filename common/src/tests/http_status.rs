use crate::HttpStatusCode;

/// **VALUE**: Pins down the success range used to classify warehouse responses.
///
/// **BUG THIS CATCHES**: Would catch an off-by-one in the range check that made a
/// 204 from the authenticate endpoint look like a failure, or a 300 look like success.
#[test]
fn given_status_codes_when_classified_then_only_2xx_is_success() {
    // GIVEN: Boundary status codes
    let cases = [
        (199, false),
        (200, true),
        (204, true),
        (299, true),
        (300, false),
        (400, false),
        (500, false),
    ];

    // WHEN/THEN: Only the 2xx range counts as success
    for (code, success) in cases {
        let status = HttpStatusCode::from(code);
        assert_eq!(status.is_success(), success, "is_success for {code}");
    }
}

#[test]
fn given_named_constants_when_compared_then_match_raw_codes() {
    assert_eq!(HttpStatusCode::OK, HttpStatusCode(200));
    assert_eq!(HttpStatusCode::BAD_REQUEST, HttpStatusCode(400));
    assert_eq!(HttpStatusCode(503).to_string(), "503");
}
