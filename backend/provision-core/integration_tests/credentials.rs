use provision_core::installer::CloneCredentials;
use provision_core::installer::credentials::DEFAULT_PRIVATE_URL_PATTERN;

use common::RedactedSecret;

fn with_token(token: &str) -> CloneCredentials {
    CloneCredentials::new(Some(RedactedSecret::new(token)), DEFAULT_PRIVATE_URL_PATTERN).unwrap()
}

/// **VALUE**: Verifies the token is embedded for organization repositories.
///
/// **WHY THIS MATTERS**: Without the token, cloning a private repository in CI
/// fails with an authentication error and the whole run aborts.
#[test]
fn given_private_url_and_token_when_rewritten_then_token_is_userinfo() {
    // GIVEN: A token and a URL under the private organization
    let credentials = with_token("ghp_abc123");

    // WHEN: Rewriting
    let url = credentials
        .clone_url("https://github.com/OGR-EIU/model.git")
        .unwrap();

    // THEN: https://<token>@github.com/...
    assert_eq!(url.expose(), "https://ghp_abc123@github.com/OGR-EIU/model.git");
    assert!(url.has_credentials());

    // AND: The printable form hides the token
    assert!(!url.to_string().contains("ghp_abc123"));
    assert!(!format!("{url:?}").contains("ghp_abc123"));
}

/// **VALUE**: Verifies URLs outside the organization pass through byte-for-byte.
///
/// **BUG THIS CATCHES**: Would catch the token leaking to third-party hosts, or
/// URL normalization (trailing slash, case folding, percent-encoding) changing
/// addresses that were never meant to be touched.
#[test]
fn given_non_matching_urls_when_rewritten_then_returned_unchanged() {
    // GIVEN: A token and URLs that don't match the pattern
    let credentials = with_token("ghp_abc123");
    let urls = [
        "https://github.com/other-org/toolset.git",
        "https://gitlab.com/OGR-EIU/model.git",
        "git@github.com:OGR-EIU/model.git",
        "HTTPS://GitHub.com/OGR-EIU/Model.git",
        "https://github.com/OGR-EIU-fork/model",
        "/local/path/to/repo",
    ];

    for original in urls {
        // WHEN: Rewriting
        let url = credentials.clone_url(original).unwrap();

        // THEN: Identical text, no credentials
        assert_eq!(url.expose(), original);
        assert!(!url.has_credentials(), "{original} should not carry a token");
    }
}

#[test]
fn given_no_token_when_rewriting_private_url_then_unchanged() {
    let credentials = CloneCredentials::anonymous();

    let url = credentials
        .clone_url("https://github.com/OGR-EIU/model.git")
        .unwrap();

    assert_eq!(url.expose(), "https://github.com/OGR-EIU/model.git");
    assert!(!credentials.has_token());
}

#[test]
fn given_empty_token_when_constructed_then_treated_as_absent() {
    let credentials = with_token("");

    assert!(!credentials.has_token());
}

#[test]
fn given_custom_pattern_when_rewriting_then_pattern_decides() {
    // GIVEN: A self-hosted forge pattern
    let credentials = CloneCredentials::new(
        Some(RedactedSecret::new("tok")),
        r"^https://git\.example\.org/",
    )
    .unwrap();

    // WHEN/THEN: Only the forge gets the token
    assert_eq!(
        credentials
            .clone_url("https://git.example.org/team/repo.git")
            .unwrap()
            .expose(),
        "https://tok@git.example.org/team/repo.git"
    );
    assert_eq!(
        credentials
            .clone_url("https://github.com/OGR-EIU/model.git")
            .unwrap()
            .expose(),
        "https://github.com/OGR-EIU/model.git"
    );
}

#[test]
fn given_token_with_reserved_characters_when_rewritten_then_encoded_and_still_scrubbed() {
    let credentials = with_token("to/ken@x");

    let url = credentials
        .clone_url("https://github.com/OGR-EIU/model.git")
        .unwrap();

    assert!(url.expose().starts_with("https://to%2Fken%40x@github.com/"));
    assert_eq!(url.scrub(url.expose()), url.to_string());
    assert!(!url.to_string().contains("%2Fken"));
}
