use taskboard::api::v1::recover_error;
use warp::Filter;
use warp::http::StatusCode;

#[tokio::test]
async fn a_missing_authorization_header_is_unauthorized_not_internal() {
    let route = warp::get()
        .and(warp::header::<String>("authorization"))
        .map(|_header: String| "ok")
        .recover(recover_error);

    let res = warp::test::request().method("GET").reply(&route).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = String::from_utf8_lossy(res.body());
    assert!(body.contains("Unauthorized"));
}
