use vrdb_terminal::api::ApiClient;

#[test]
fn base_url_is_normalized() {
    let api = ApiClient::new("https://api.example.com/repos/demo/");
    assert_eq!(api.base_url(), "https://api.example.com/repos/demo");
}

#[test]
fn endpoint_urls_join_with_a_single_slash() {
    let api = ApiClient::new("https://api.example.com/repos/demo");
    assert_eq!(
        api.endpoint_url("/status"),
        "https://api.example.com/repos/demo/status"
    );
    assert_eq!(
        api.endpoint_url("issues"),
        "https://api.example.com/repos/demo/issues"
    );
}

#[test]
fn empty_endpoint_targets_the_base_url() {
    let api = ApiClient::new("https://api.example.com/repos/demo");
    assert_eq!(api.endpoint_url(""), "https://api.example.com/repos/demo");
}
