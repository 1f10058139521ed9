use crate::admin::{self, QrSummary};
use crate::auth;
use crate::metrics::{inc_verification, metrics_middleware, render_metrics};
use crate::pages;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use certverify_common::entities::{RecordStatus, certificates, signers};
use certverify_common::error::{CertError, Result as CertResult};
use certverify_common::models::{CreateCertificate, CreateSigner, UpdateCertificate, UpdateSigner};
use certverify_common::qr;
use certverify_common::state::RecordKind;
use certverify_common::store::CertificateWithSigner;
use certverify_common::verification::{self, CertificateView, SignerView, Verification};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

type ApiResult<T> = CertResult<T>;

/// 管理接口的路径 id；无法解析时按记录不存在处理
fn record_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| CertError::not_found(format!("record {raw}")))
}

type CertificateModel = certificates::Model;
type SignerModel = signers::Model;

pub fn router(state: AppState) -> Router {
    let admin_pages = Router::new()
        .route("/admin", get(pages::admin_home))
        .route(
            "/admin/certificates",
            get(pages::certificates_page).post(pages::create_certificate),
        )
        .route("/admin/certificates/{id}", post(pages::update_certificate))
        .route(
            "/admin/certificates/{id}/edit",
            get(pages::edit_certificate_page),
        )
        .route(
            "/admin/certificates/{id}/toggle",
            post(pages::toggle_certificate),
        )
        .route("/admin/certificates/{id}/qr", get(pages::certificate_qr_page))
        .route(
            "/admin/signers",
            get(pages::signers_page).post(pages::create_signer),
        )
        .route("/admin/signers/{id}/toggle", post(pages::toggle_signer))
        .route("/admin/signers/{id}/qr", get(pages::signer_qr_page))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin_page,
        ));

    let management = Router::new()
        .route(
            "/api/v1/certificates",
            post(create_certificate).get(list_certificates),
        )
        .route(
            "/api/v1/certificates/{id}",
            get(get_certificate).patch(update_certificate),
        )
        .route(
            "/api/v1/certificates/{id}/toggle",
            post(toggle_certificate),
        )
        .route("/api/v1/certificates/{id}/qr", get(certificate_qr))
        .route("/api/v1/certificates/{id}/qr.png", get(certificate_qr_png))
        .route("/api/v1/certificates/{id}/qr.svg", get(certificate_qr_svg))
        .route("/api/v1/signers", post(create_signer).get(list_signers))
        .route(
            "/api/v1/signers/{id}",
            get(get_signer).patch(update_signer),
        )
        .route("/api/v1/signers/{id}/toggle", post(toggle_signer))
        .route("/api/v1/signers/{id}/qr", get(signer_qr))
        .route("/api/v1/signers/{id}/qr.png", get(signer_qr_png))
        .route("/api/v1/signers/{id}/qr.svg", get(signer_qr_svg))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin_api,
        ));

    Router::new()
        .route("/", get(pages::landing))
        .route("/login", get(auth::login_form).post(auth::login_submit))
        .route("/logout", post(auth::logout))
        .route("/verify/certificate/{id}", get(pages::verify_certificate))
        .route("/verifikasi/sertifikat/{id}", get(pages::verify_certificate))
        .route("/verify/signature/{id}", get(pages::verify_signature))
        .route(
            "/verifikasi/tanda-tangan/{id}",
            get(pages::verify_signature),
        )
        .route("/api/v1/auth/login", post(auth::api_login))
        .route(
            "/api/v1/verify/certificate/{id}",
            get(verify_certificate),
        )
        .route("/api/v1/verify/signature/{id}", get(verify_signature))
        .route("/api/v1/metrics", get(metrics))
        .merge(admin_pages)
        .merge(management)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============ 证书 ============

#[derive(Debug, Serialize)]
struct CertificateListItem {
    #[serde(flatten)]
    certificate: CertificateModel,
    signer: Option<SignerModel>,
}

impl From<CertificateWithSigner> for CertificateListItem {
    fn from((certificate, signer): CertificateWithSigner) -> Self {
        Self {
            certificate,
            signer,
        }
    }
}

#[derive(Debug, Serialize)]
struct CreatedCertificate {
    certificate: CertificateModel,
    signer: Option<SignerModel>,
}

async fn create_certificate(
    State(state): State<AppState>,
    Json(payload): Json<CreateCertificate>,
) -> ApiResult<Json<CreatedCertificate>> {
    let (certificate, signer) = admin::submit_certificate(&state, payload).await?;
    Ok(Json(CreatedCertificate {
        certificate,
        signer,
    }))
}

async fn list_certificates(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CertificateListItem>>> {
    let list = state.store.list_certificates_with_signers().await?;
    Ok(Json(list.into_iter().map(Into::into).collect()))
}

async fn get_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CertificateModel>> {
    let id = record_id(&id)?;
    let certificate = state
        .store
        .get_certificate(id)
        .await?
        .ok_or_else(|| CertError::not_found(format!("certificate {id}")))?;
    Ok(Json(certificate))
}

async fn update_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCertificate>,
) -> ApiResult<Json<CertificateModel>> {
    let id = record_id(&id)?;
    let updated = admin::edit_certificate(&state, id, payload).await?;
    Ok(Json(updated))
}

async fn toggle_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CertificateModel>> {
    let id = record_id(&id)?;
    Ok(Json(admin::toggle_certificate(&state, id).await?))
}

#[derive(Debug, Serialize)]
struct CertificateQrResponse {
    certificate: CertificateModel,
    signer: SignerModel,
    certificate_qr: QrSummary,
    signer_qr: QrSummary,
}

async fn certificate_qr(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CertificateQrResponse>> {
    let id = record_id(&id)?;
    let qr = admin::certificate_qr(&state, id).await?;
    Ok(Json(CertificateQrResponse {
        certificate_qr: qr.certificate_qr.summary(),
        signer_qr: qr.signer_qr.summary(),
        certificate: qr.certificate,
        signer: qr.signer,
    }))
}

fn png_response(png: Vec<u8>, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        png,
    )
        .into_response()
}

fn svg_response(svg: String) -> Response {
    ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response()
}

async fn certificate_qr_png(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = record_id(&id)?;
    let panel = admin::certificate_qr_panel(&state, id).await?;
    Ok(png_response(panel.image.png, &panel.filename))
}

async fn certificate_qr_svg(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = record_id(&id)?;
    let certificate = state
        .store
        .get_certificate(id)
        .await?
        .ok_or_else(|| CertError::not_found(format!("certificate {id}")))?;
    let svg = qr::encode_svg(&state.links.certificate(certificate.id), &state.qr)?;
    Ok(svg_response(svg))
}

// ============ 签署人 ============

async fn create_signer(
    State(state): State<AppState>,
    Json(payload): Json<CreateSigner>,
) -> ApiResult<Json<SignerModel>> {
    Ok(Json(admin::submit_signer(&state, payload).await?))
}

#[derive(Debug, Deserialize)]
struct SignerFilter {
    status: Option<RecordStatus>,
}

async fn list_signers(
    State(state): State<AppState>,
    Query(filter): Query<SignerFilter>,
) -> ApiResult<Json<Vec<SignerModel>>> {
    let list = match filter.status {
        Some(RecordStatus::Active) => state.store.list_active_signers().await?,
        Some(RecordStatus::Inactive) => state
            .store
            .list_signers()
            .await?
            .into_iter()
            .filter(|s| !s.status.is_active())
            .collect(),
        None => state.store.list_signers().await?,
    };
    Ok(Json(list))
}

async fn get_signer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SignerModel>> {
    let id = record_id(&id)?;
    let signer = state
        .store
        .get_signer(id)
        .await?
        .ok_or_else(|| CertError::not_found(format!("signer {id}")))?;
    Ok(Json(signer))
}

async fn update_signer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSigner>,
) -> ApiResult<Json<SignerModel>> {
    let id = record_id(&id)?;
    Ok(Json(admin::edit_signer(&state, id, payload).await?))
}

async fn toggle_signer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SignerModel>> {
    let id = record_id(&id)?;
    Ok(Json(admin::toggle_signer(&state, id).await?))
}

#[derive(Debug, Serialize)]
struct SignerQrResponse {
    signer: SignerModel,
    signer_qr: QrSummary,
}

async fn signer_qr(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SignerQrResponse>> {
    let id = record_id(&id)?;
    let (signer, panel) = admin::signer_qr(&state, id).await?;
    Ok(Json(SignerQrResponse {
        signer,
        signer_qr: panel.summary(),
    }))
}

async fn signer_qr_png(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = record_id(&id)?;
    let (_, panel) = admin::signer_qr(&state, id).await?;
    Ok(png_response(panel.image.png, &panel.filename))
}

async fn signer_qr_svg(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = record_id(&id)?;
    let signer = state
        .store
        .get_signer(id)
        .await?
        .ok_or_else(|| CertError::not_found(format!("signer {id}")))?;
    let svg = qr::encode_svg(&state.links.signature(signer.id), &state.qr)?;
    Ok(svg_response(svg))
}

// ============ 公开验证 ============

async fn verify_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Verification<CertificateView>>> {
    let outcome = verification::verify_certificate(&state.store, &id).await?;
    inc_verification(RecordKind::Certificate.as_str(), outcome.outcome());
    Ok(Json(outcome))
}

async fn verify_signature(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Verification<SignerView>>> {
    let outcome = verification::verify_signer(&state.store, &id).await?;
    inc_verification(RecordKind::Signer.as_str(), outcome.outcome());
    Ok(Json(outcome))
}

async fn metrics() -> Response {
    render_metrics()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::tests::{BASE_URL, certificate_input, create_test_state, decode_png};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn body_text(response: Response) -> String {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn authed(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"));
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn unknown_certificate_renders_not_found_view() {
        let state = create_test_state().await;
        let app = router(state);

        let response = send(
            &app,
            get_request(&format!("/verify/certificate/{}", Uuid::new_v4())),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = body_text(response).await;
        assert!(html.contains("Sertifikat tidak valid atau tidak ditemukan"));
        assert!(!html.contains("Diberikan kepada"));
        assert!(!html.contains("No. Sertifikat"));

        let response = send(&app, get_request("/verifikasi/sertifikat/garbage")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn verified_certificate_renders_default_units() {
        let state = create_test_state().await;
        let (certificate, _) = admin::submit_certificate(&state, certificate_input("CERT-001"))
            .await
            .unwrap();
        let app = router(state);

        let response = send(
            &app,
            get_request(&format!("/verify/certificate/{}", certificate.id)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Sertifikat Terverifikasi"));
        assert!(html.contains("Jane Doe"));
        assert!(html.contains("CERT-001"));
        assert!(html.contains("F.42PPT01.001.1"));
        assert!(html.contains("F.42PPT01.012.1"));
        let first = html.find("F.42PPT01.001.1").unwrap();
        let last = html.find("F.42PPT01.012.1").unwrap();
        assert!(first < last);
    }

    #[tokio::test]
    async fn deactivated_signer_renders_rejection_view() {
        let state = create_test_state().await;
        let (_, signer) = admin::submit_certificate(&state, certificate_input("CERT-001"))
            .await
            .unwrap();
        let signer = signer.unwrap();
        state
            .store
            .update_signer(
                signer.id,
                UpdateSigner {
                    status: Some(RecordStatus::Inactive),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let app = router(state);

        for uri in [
            format!("/verify/signature/{}", signer.id),
            format!("/verifikasi/tanda-tangan/{}", signer.id),
        ] {
            let response = send(&app, get_request(&uri)).await;
            assert_eq!(response.status(), StatusCode::GONE);
            let html = body_text(response).await;
            assert!(html.contains("Tanda tangan tidak aktif atau telah dicabut"));
            assert!(!html.contains("Ketua LPK"));
            assert!(!html.contains("CERT-001"));
        }
    }

    #[tokio::test]
    async fn verification_json_is_tagged() {
        let state = create_test_state().await;
        let (certificate, _) = admin::submit_certificate(&state, certificate_input("CERT-J"))
            .await
            .unwrap();
        let app = router(state);

        let response = send(
            &app,
            get_request(&format!("/api/v1/verify/certificate/{}", certificate.id)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["outcome"], "verified");
        assert_eq!(json["record"]["no_sertifikat"], "CERT-J");
        assert_eq!(json["record"]["competency_units"].as_array().unwrap().len(), 12);

        let response = send(
            &app,
            get_request(&format!("/api/v1/verify/signature/{}", Uuid::new_v4())),
        )
        .await;
        let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json, json!({"outcome": "not_found"}));
    }

    #[tokio::test]
    async fn admin_routes_require_session() {
        let state = create_test_state().await;
        let app = router(state);

        let response = send(&app, get_request("/admin/certificates")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");

        let response = send(&app, get_request("/api/v1/certificates")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert!(json.get("error").is_some());

        let response = send(&app, authed("GET", "/api/v1/signers", "forged", None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn form_login_sets_session_cookie() {
        let state = create_test_state().await;
        let app = router(state);

        let response = send(
            &app,
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("email=admin%40lpk.test&password=salah"))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_text(response).await.contains("Email atau password salah"));

        let response = send(
            &app,
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("email=admin%40lpk.test&password=rahasia"))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookie = response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("certverify_session="));
        assert!(cookie.contains("HttpOnly"));
        let pair = cookie.split(';').next().unwrap().to_string();

        let response = send(
            &app,
            Request::builder()
                .method("GET")
                .uri("/admin/certificates")
                .header(header::COOKIE, pair)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Tambah Sertifikat"));
    }

    async fn api_token(app: &Router) -> String {
        let response = send(
            app,
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"email": "admin@lpk.test", "password": "rahasia"}).to_string(),
                ))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
        json["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn api_certificate_lifecycle() {
        let state = create_test_state().await;
        let app = router(state);
        let token = api_token(&app).await;

        let response = send(
            &app,
            authed(
                "POST",
                "/api/v1/certificates",
                &token,
                Some(json!({
                    "no_sertifikat": "CERT-001",
                    "nama_peserta": "Jane Doe",
                    "nama_kegiatan": "Welding L2"
                })),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let created: Value = serde_json::from_str(&body_text(response).await).unwrap();
        let id = created["certificate"]["id"].as_str().unwrap().to_string();
        assert_eq!(created["certificate"]["status"], "aktif");
        assert_eq!(created["signer"]["no_kegiatan"], "CERT-001");
        assert_eq!(
            created["certificate"]["competency_units"]
                .as_array()
                .unwrap()
                .len(),
            12
        );

        let response = send(
            &app,
            authed(
                "POST",
                "/api/v1/certificates",
                &token,
                Some(json!({
                    "no_sertifikat": "CERT-001",
                    "nama_peserta": "Someone Else",
                    "nama_kegiatan": "Welding L2"
                })),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = send(
            &app,
            authed(
                "PATCH",
                &format!("/api/v1/certificates/{id}"),
                &token,
                Some(json!({"signer_id": Uuid::new_v4()})),
            ),
        )
        .await;
        assert!(response.status().is_client_error());

        let response = send(
            &app,
            authed(
                "POST",
                &format!("/api/v1/certificates/{id}/toggle"),
                &token,
                None,
            ),
        )
        .await;
        let toggled: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(toggled["status"], "nonaktif");

        let response = send(&app, get_request(&format!("/verify/certificate/{id}"))).await;
        assert_eq!(response.status(), StatusCode::GONE);
        assert!(
            body_text(response)
                .await
                .contains("Sertifikat tidak aktif atau telah dicabut")
        );

        let response = send(&app, authed("GET", "/api/v1/certificates", &token, None)).await;
        let list: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["signer"]["nama_lengkap"], "Ketua LPK");
    }

    #[tokio::test]
    async fn signer_listing_filters_by_status() {
        let state = create_test_state().await;
        let keep = admin::submit_signer(
            &state,
            CreateSigner {
                nama_lengkap: "Aktif".to_string(),
                no_kegiatan: "K-1".to_string(),
            },
        )
        .await
        .unwrap();
        let off = admin::submit_signer(
            &state,
            CreateSigner {
                nama_lengkap: "Nonaktif".to_string(),
                no_kegiatan: "K-2".to_string(),
            },
        )
        .await
        .unwrap();
        admin::toggle_signer(&state, off.id).await.unwrap();
        let app = router(state);
        let token = api_token(&app).await;

        let request = authed("GET", "/api/v1/signers?status=aktif", &token, None);
        let response = send(&app, request).await;
        let list: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["id"], keep.id.to_string());

        let response = send(&app, authed("GET", "/api/v1/signers", &token, None)).await;
        let list: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(list.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn qr_png_decodes_to_configured_link() {
        let state = create_test_state().await;
        let (certificate, signer) = admin::submit_certificate(&state, certificate_input("CERT-QR"))
            .await
            .unwrap();
        let signer = signer.unwrap();
        let app = router(state);
        let token = api_token(&app).await;

        let response = send(
            &app,
            authed(
                "GET",
                &format!("/api/v1/certificates/{}/qr.png", certificate.id),
                &token,
                None,
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert!(
            response.headers()[header::CONTENT_DISPOSITION]
                .to_str()
                .unwrap()
                .contains("qr-certificate-CERT-QR.png")
        );
        let png = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            decode_png(&png),
            format!("{BASE_URL}/verify/certificate/{}", certificate.id)
        );

        let response = send(
            &app,
            authed(
                "GET",
                &format!("/api/v1/signers/{}/qr.png", signer.id),
                &token,
                None,
            ),
        )
        .await;
        let png = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            decode_png(&png),
            format!("{BASE_URL}/verify/signature/{}", signer.id)
        );
    }

    #[tokio::test]
    async fn admin_list_reflects_new_records() {
        let state = create_test_state().await;
        let token = state.sessions.issue().await;
        let app = router(state);
        let cookie = format!("{}={token}", auth::SESSION_COOKIE);

        let list = |cookie: String| {
            Request::builder()
                .method("GET")
                .uri("/admin/certificates")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap()
        };

        let html = body_text(send(&app, list(cookie.clone())).await).await;
        assert!(html.contains("Belum ada sertifikat"));

        let response = send(
            &app,
            Request::builder()
                .method("POST")
                .uri("/admin/certificates")
                .header(header::COOKIE, cookie.clone())
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "no_sertifikat=CERT-777&nama_peserta=Jane+Doe&nama_kegiatan=Welding+L2&tanggal_ditetapkan=2026-10-16",
                ))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let html = body_text(send(&app, list(cookie.clone())).await).await;
        assert!(html.contains("CERT-777"));
        assert!(html.contains("16 Oktober 2026"));
        assert!(!html.contains("Belum ada sertifikat"));

        let response = send(
            &app,
            Request::builder()
                .method("POST")
                .uri("/admin/certificates")
                .header(header::COOKIE, cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "no_sertifikat=CERT-777&nama_peserta=Dup&nama_kegiatan=Welding+L2&tanggal_ditetapkan=",
                ))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(
            body_text(response)
                .await
                .contains("Pastikan nomor sertifikat unik")
        );
    }

    fn admin_get(cookie: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    fn admin_form(cookie: &str, uri: &str, form: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::COOKIE, cookie)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap()
    }

    async fn admin_cookie(state: &AppState) -> String {
        format!("{}={}", auth::SESSION_COOKIE, state.sessions.issue().await)
    }

    #[tokio::test]
    async fn signer_rename_shows_in_certificate_list() {
        let state = create_test_state().await;
        let (_, signer) = admin::submit_certificate(&state, certificate_input("CERT-P"))
            .await
            .unwrap();
        let signer = signer.unwrap();
        let cookie = admin_cookie(&state).await;
        let app = router(state.clone());

        let html = body_text(send(&app, admin_get(&cookie, "/admin/certificates")).await).await;
        assert!(html.contains("Ketua LPK"));

        admin::edit_signer(
            &state,
            signer.id,
            UpdateSigner {
                nama_lengkap: Some("Dr. Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let html = body_text(send(&app, admin_get(&cookie, "/admin/certificates")).await).await;
        assert!(html.contains("Dr. Renamed"));
        assert!(!html.contains("Ketua LPK"));
    }

    #[tokio::test]
    async fn html_edit_and_toggle_update_certificate_list() {
        let state = create_test_state().await;
        let mut input = certificate_input("CERT-E");
        input.tanggal_ditetapkan = chrono::NaiveDate::from_ymd_opt(2026, 3, 2);
        let (certificate, _) = admin::submit_certificate(&state, input).await.unwrap();
        let cookie = admin_cookie(&state).await;
        let app = router(state.clone());

        let html = body_text(send(&app, admin_get(&cookie, "/admin/certificates")).await).await;
        assert!(html.contains("Jane Doe"));

        let response = send(
            &app,
            admin_get(&cookie, &format!("/admin/certificates/{}/edit", certificate.id)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("2026-03-02"));

        let response = send(
            &app,
            admin_form(
                &cookie,
                &format!("/admin/certificates/{}", certificate.id),
                "no_sertifikat=CERT-E&nama_peserta=John+Roe&nama_kegiatan=Welding+L2&tanggal_ditetapkan=",
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let stored = state.store.get_certificate(certificate.id).await.unwrap().unwrap();
        assert_eq!(stored.nama_peserta, "John Roe");
        assert_eq!(stored.tanggal_ditetapkan, certificate.tanggal_ditetapkan);

        let html = body_text(send(&app, admin_get(&cookie, "/admin/certificates")).await).await;
        assert!(html.contains("John Roe"));
        assert!(!html.contains("Jane Doe"));

        let response = send(
            &app,
            admin_form(
                &cookie,
                &format!("/admin/certificates/{}", certificate.id),
                "no_sertifikat=CERT-E&nama_peserta=John+Roe&nama_kegiatan=Welding+L2&tanggal_ditetapkan=02-03-2026",
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("tanggal_ditetapkan"));

        let response = send(
            &app,
            admin_form(
                &cookie,
                &format!("/admin/certificates/{}/toggle", certificate.id),
                "",
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let html = body_text(send(&app, admin_get(&cookie, "/admin/certificates")).await).await;
        assert!(html.contains("Nonaktif"));
        assert!(html.contains(">Aktifkan<"));

        let response = send(
            &app,
            get_request(&format!("/verify/certificate/{}", certificate.id)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::GONE);

        let request = admin_form(&cookie, "/admin/certificates/garbage/toggle", "");
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn html_signer_creation_and_toggle() {
        let state = create_test_state().await;
        let cookie = admin_cookie(&state).await;
        let app = router(state.clone());

        let html = body_text(send(&app, admin_get(&cookie, "/admin/signers")).await).await;
        assert!(html.contains("Belum ada penandatangan"));

        let response = send(
            &app,
            admin_form(&cookie, "/admin/signers", "nama_lengkap=Budi+Santoso&no_kegiatan=KEG-7"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/admin/signers");

        let html = body_text(send(&app, admin_get(&cookie, "/admin/signers")).await).await;
        assert!(html.contains("Budi Santoso"));
        assert!(!html.contains("Belum ada penandatangan"));

        let response = send(
            &app,
            admin_form(&cookie, "/admin/signers", "nama_lengkap=+&no_kegiatan=KEG-8"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("Budi Santoso"));

        let signers = state.store.list_signers().await.unwrap();
        assert_eq!(signers.len(), 1);
        let id = signers[0].id;

        let response = send(
            &app,
            admin_form(&cookie, &format!("/admin/signers/{id}/toggle"), ""),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let stored = state.store.get_signer(id).await.unwrap().unwrap();
        assert_eq!(stored.status, RecordStatus::Inactive);

        let html = body_text(send(&app, admin_get(&cookie, "/admin/signers")).await).await;
        assert!(html.contains(">Aktifkan<"));
    }

    #[tokio::test]
    async fn malformed_management_id_is_json_not_found() {
        let state = create_test_state().await;
        let app = router(state);
        let token = api_token(&app).await;

        for (method, uri) in [
            ("GET", "/api/v1/certificates/not-a-uuid"),
            ("POST", "/api/v1/certificates/not-a-uuid/toggle"),
            ("GET", "/api/v1/signers/not-a-uuid/qr.png"),
        ] {
            let response = send(&app, authed(method, uri, &token, None)).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method} {uri}");
            let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
            assert!(json["error"].is_string(), "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn issue_date_cleared_with_explicit_null() {
        let state = create_test_state().await;
        let mut input = certificate_input("CERT-N");
        input.tanggal_ditetapkan = chrono::NaiveDate::from_ymd_opt(2026, 3, 2);
        let (certificate, _) = admin::submit_certificate(&state, input).await.unwrap();
        let app = router(state);
        let token = api_token(&app).await;

        let response = send(
            &app,
            authed(
                "PATCH",
                &format!("/api/v1/certificates/{}", certificate.id),
                &token,
                Some(json!({"tanggal_ditetapkan": null})),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert!(json["tanggal_ditetapkan"].is_null());
    }
}
