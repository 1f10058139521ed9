//! HTML 渲染
//!
//! 页面较少，直接用 `format!` 拼接；所有来自数据库或用户输入的文本都经过转义。

use crate::admin::{CertificateQr, QrPanel};
use certverify_common::dates::{format_long_date, format_long_datetime, format_optional_date};
use certverify_common::entities::{RecordStatus, certificates, signers};
use certverify_common::store::CertificateWithSigner;
use certverify_common::verification::{CertificateView, SignedOnSource, SignerView, Verification};
use chrono::{DateTime, FixedOffset};

const STYLE: &str = r#"
body { font-family: ui-sans-serif, system-ui, sans-serif; margin: 0; background: #f4f6f8; color: #1f2933; }
header { background: #1e3a8a; color: #fff; padding: 16px 24px; }
header a { color: #fff; margin-right: 16px; text-decoration: none; }
main { max-width: 960px; margin: 24px auto; padding: 0 16px; }
.card { background: #fff; border-radius: 8px; padding: 24px; margin-bottom: 24px; box-shadow: 0 1px 3px rgba(0,0,0,.08); }
.ok { border-top: 6px solid #15803d; }
.fail { border-top: 6px solid #b91c1c; }
.error { background: #fee2e2; color: #991b1b; padding: 12px; border-radius: 6px; margin-bottom: 16px; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 8px; border-bottom: 1px solid #e5e7eb; vertical-align: top; }
.badge { padding: 2px 8px; border-radius: 999px; font-size: 12px; }
.aktif { background: #dcfce7; color: #166534; }
.nonaktif { background: #fee2e2; color: #991b1b; }
.qr-grid { display: flex; gap: 24px; flex-wrap: wrap; }
.qr-grid figure { margin: 0; text-align: center; }
.actions form { display: inline; }
label { display: block; margin: 8px 0 4px; }
input { padding: 6px; width: 100%; box-sizing: border-box; }
button, .button { margin-top: 12px; padding: 6px 12px; }
footer { text-align: center; color: #6b7280; font-size: 13px; padding: 24px; }
"#;

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn layout(title: &str, nav: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="id">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>{title}</title>
    <style>{STYLE}</style>
  </head>
  <body>
    <header><strong>Sistem Validasi Sertifikasi</strong> {nav}</header>
    <main>
{body}
    </main>
    <footer>LPK Sertifikasi Tenaga Kerja</footer>
  </body>
</html>"#,
        title = escape_html(title),
    )
}

fn admin_layout(title: &str, body: &str) -> String {
    let nav = r#"<nav style="display:inline;margin-left:24px">
<a href="/admin/certificates">Sertifikat</a><a href="/admin/signers">Penandatangan</a>
<form method="post" action="/logout" style="display:inline"><button type="submit">Keluar</button></form>
</nav>"#;
    layout(title, nav, body)
}

fn error_banner(error: Option<&str>) -> String {
    error
        .map(|msg| format!(r#"<div class="error">{}</div>"#, escape_html(msg)))
        .unwrap_or_default()
}

fn status_badge(status: RecordStatus) -> String {
    let label = if status.is_active() { "Aktif" } else { "Nonaktif" };
    format!(
        r#"<span class="badge {}">{}</span>"#,
        status.as_str(),
        label
    )
}

fn toggle_label(status: RecordStatus) -> &'static str {
    if status.is_active() {
        "Nonaktifkan"
    } else {
        "Aktifkan"
    }
}

// ============ 公开页面 ============

pub fn landing_page() -> String {
    let body = r#"<section class="card">
  <h1>Sistem Verifikasi Sertifikat Resmi</h1>
  <p>Pindai kode QR pada sertifikat atau tanda tangan untuk memastikan keasliannya.
  Halaman verifikasi menampilkan data resmi yang terdaftar di LPK Sertifikasi Tenaga Kerja.</p>
  <p><a href="/login">Masuk sebagai admin</a></p>
</section>"#;
    layout("Verifikasi Sertifikat", "", body)
}

pub fn login_page(error: Option<&str>) -> String {
    let body = format!(
        r#"<section class="card" style="max-width:420px;margin:auto">
  <h1>Login Admin</h1>
  {error}
  <form method="post" action="/login">
    <label for="email">Email</label>
    <input id="email" name="email" type="email" required />
    <label for="password">Password</label>
    <input id="password" name="password" type="password" required />
    <button type="submit">Masuk</button>
  </form>
</section>"#,
        error = error_banner(error),
    );
    layout("Login Admin", "", &body)
}

/// 验证服务暂时不可用时的通用页面，不含任何记录信息
pub fn verification_failure_page() -> String {
    let body = r#"<section class="card fail">
  <h1>Validasi Gagal</h1>
  <p>Terjadi kesalahan saat memverifikasi. Silakan coba lagi beberapa saat lagi.</p>
</section>"#;
    layout("Validasi Gagal", "", body)
}

fn rejection_section(message: &str) -> String {
    format!(
        r#"<section class="card fail">
  <h1>Validasi Gagal</h1>
  <p>{}</p>
</section>"#,
        escape_html(message)
    )
}

pub fn certificate_rejection_message<T>(outcome: &Verification<T>) -> Option<&'static str> {
    match outcome {
        Verification::Verified(_) => None,
        Verification::NotFound => Some("Sertifikat tidak valid atau tidak ditemukan"),
        Verification::Inactive => Some("Sertifikat tidak aktif atau telah dicabut"),
    }
}

pub fn signer_rejection_message<T>(outcome: &Verification<T>) -> Option<&'static str> {
    match outcome {
        Verification::Verified(_) => None,
        Verification::NotFound => Some("Tanda tangan tidak valid atau tidak ditemukan"),
        Verification::Inactive => Some("Tanda tangan tidak aktif atau telah dicabut"),
    }
}

pub fn certificate_verification_page(
    outcome: &Verification<CertificateView>,
    verified_at: &DateTime<FixedOffset>,
) -> String {
    let view = match outcome {
        Verification::Verified(view) => view,
        _ => {
            let message = certificate_rejection_message(outcome).unwrap_or_default();
            return layout("Validasi Gagal", "", &rejection_section(message));
        }
    };

    let units: String = view
        .competency_units
        .iter()
        .map(|unit| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                unit.no,
                escape_html(&unit.kode_unit),
                escape_html(&unit.judul_unit)
            )
        })
        .collect();

    let body = format!(
        r#"<section class="card ok">
  <h1>Sertifikat Terverifikasi</h1>
  <p>Diberikan kepada</p>
  <h2>{nama_peserta}</h2>
  <table>
    <tr><th>No. Sertifikat</th><td>{no_sertifikat}</td></tr>
    <tr><th>Program</th><td>{nama_kegiatan}</td></tr>
    <tr><th>Tanggal Ditetapkan</th><td>{tanggal}</td></tr>
    <tr><th>Diverifikasi pada</th><td>{verified_at}</td></tr>
  </table>
</section>
<section class="card">
  <h2>LIST UNIT KOMPETENSI</h2>
  <table>
    <tr><th>No</th><th>Kode Unit (Unit Code)</th><th>Judul Unit (Unit Title)</th></tr>
{units}  </table>
</section>"#,
        nama_peserta = escape_html(&view.nama_peserta),
        no_sertifikat = escape_html(&view.no_sertifikat),
        nama_kegiatan = escape_html(&view.nama_kegiatan),
        tanggal = format_optional_date(view.tanggal_ditetapkan),
        verified_at = format_long_datetime(verified_at),
    );
    layout("Sertifikat Terverifikasi", "", &body)
}

pub fn signer_verification_page(
    outcome: &Verification<SignerView>,
    verified_at: &DateTime<FixedOffset>,
) -> String {
    let view = match outcome {
        Verification::Verified(view) => view,
        _ => {
            let message = signer_rejection_message(outcome).unwrap_or_default();
            return layout("Validasi Gagal", "", &rejection_section(message));
        }
    };

    let signed_label = match view.signed_on_source {
        SignedOnSource::Certificate => "Tanggal Penetapan",
        SignedOnSource::Registration => "Terdaftar Sejak",
    };

    let body = format!(
        r#"<section class="card ok">
  <h1>Authorized Signature Verified</h1>
  <p><span class="badge aktif">AKTIF &amp; BERWENANG</span></p>
  <table>
    <tr><th>NAMA PENANDATANGAN</th><td>{nama_lengkap}</td></tr>
    <tr><th>NO. KEGIATAN</th><td>{no_kegiatan}</td></tr>
    <tr><th>{signed_label}</th><td>{signed_on}</td></tr>
  </table>
</section>
<section class="card">
  <h2>Informasi Validasi</h2>
  <p>ID Validasi: <code>{id}</code></p>
  <p>Waktu Validasi: {verified_at}</p>
  <h2>Pernyataan Resmi</h2>
  <p>Tanda tangan ini sah dan terdaftar secara resmi.</p>
</section>"#,
        nama_lengkap = escape_html(&view.nama_lengkap),
        no_kegiatan = escape_html(&view.no_kegiatan),
        signed_on = format_long_date(view.signed_on),
        id = view.id,
        verified_at = format_long_datetime(verified_at),
    );
    layout("Tanda Tangan Terverifikasi", "", &body)
}

// ============ 管理页面 ============

pub fn certificate_table(rows: &[CertificateWithSigner]) -> String {
    if rows.is_empty() {
        return "<p>Belum ada sertifikat.</p>".to_string();
    }
    let body: String = rows
        .iter()
        .map(|(certificate, signer)| {
            let signer_name = signer
                .as_ref()
                .map(|s| escape_html(&s.nama_lengkap))
                .unwrap_or_else(|| "-".to_string());
            format!(
                r#"<tr>
  <td>{no}</td><td>{peserta}</td><td>{kegiatan}</td><td>{tanggal}</td><td>{signer}</td><td>{status}</td>
  <td class="actions">
    <a href="/admin/certificates/{id}/qr">QR</a>
    <a href="/admin/certificates/{id}/edit">Edit</a>
    <form method="post" action="/admin/certificates/{id}/toggle"><button type="submit">{toggle}</button></form>
  </td>
</tr>
"#,
                no = escape_html(&certificate.no_sertifikat),
                peserta = escape_html(&certificate.nama_peserta),
                kegiatan = escape_html(&certificate.nama_kegiatan),
                tanggal = format_optional_date(certificate.tanggal_ditetapkan),
                signer = signer_name,
                status = status_badge(certificate.status),
                id = certificate.id,
                toggle = toggle_label(certificate.status),
            )
        })
        .collect();
    format!(
        r#"<table>
<tr><th>No. Sertifikat</th><th>Peserta</th><th>Program</th><th>Tanggal</th><th>Penandatangan</th><th>Status</th><th>Aksi</th></tr>
{body}</table>"#
    )
}

/// 证书表单字段的当前值
#[derive(Debug, Clone, Default)]
pub struct CertificateFields {
    pub no_sertifikat: String,
    pub nama_peserta: String,
    pub nama_kegiatan: String,
    pub tanggal_ditetapkan: String,
}

impl From<&certificates::Model> for CertificateFields {
    fn from(model: &certificates::Model) -> Self {
        Self {
            no_sertifikat: model.no_sertifikat.clone(),
            nama_peserta: model.nama_peserta.clone(),
            nama_kegiatan: model.nama_kegiatan.clone(),
            tanggal_ditetapkan: model
                .tanggal_ditetapkan
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

fn certificate_form(action: &str, submit: &str, fields: &CertificateFields) -> String {
    format!(
        r#"<form method="post" action="{action}">
  <label for="no_sertifikat">No. Sertifikat</label>
  <input id="no_sertifikat" name="no_sertifikat" value="{no}" required />
  <label for="nama_peserta">Nama Peserta</label>
  <input id="nama_peserta" name="nama_peserta" value="{peserta}" required />
  <label for="nama_kegiatan">Nama Kegiatan</label>
  <input id="nama_kegiatan" name="nama_kegiatan" value="{kegiatan}" required />
  <label for="tanggal_ditetapkan">Tanggal Ditetapkan</label>
  <input id="tanggal_ditetapkan" name="tanggal_ditetapkan" type="date" value="{tanggal}" />
  <button type="submit">{submit}</button>
</form>"#,
        no = escape_html(&fields.no_sertifikat),
        peserta = escape_html(&fields.nama_peserta),
        kegiatan = escape_html(&fields.nama_kegiatan),
        tanggal = escape_html(&fields.tanggal_ditetapkan),
    )
}

pub fn certificates_page(table: &str, fields: &CertificateFields, error: Option<&str>) -> String {
    let body = format!(
        r#"<section class="card">
  <h1>Tambah Sertifikat</h1>
  {error}
  {form}
</section>
<section class="card">
  <h2>Daftar Sertifikat</h2>
  {table}
</section>"#,
        error = error_banner(error),
        form = certificate_form("/admin/certificates", "Simpan", fields),
    );
    admin_layout("Sertifikat", &body)
}

pub fn certificate_edit_page(
    certificate: &certificates::Model,
    fields: &CertificateFields,
    error: Option<&str>,
) -> String {
    let body = format!(
        r#"<section class="card">
  <h1>Edit Sertifikat</h1>
  {error}
  {form}
  <p><a href="/admin/certificates">Kembali</a></p>
</section>"#,
        error = error_banner(error),
        form = certificate_form(
            &format!("/admin/certificates/{}", certificate.id),
            "Perbarui",
            fields
        ),
    );
    admin_layout("Edit Sertifikat", &body)
}

pub fn signer_table(rows: &[signers::Model]) -> String {
    if rows.is_empty() {
        return "<p>Belum ada penandatangan.</p>".to_string();
    }
    let body: String = rows
        .iter()
        .map(|signer| {
            format!(
                r#"<tr>
  <td>{nama}</td><td>{kegiatan}</td><td>{terdaftar}</td><td>{status}</td>
  <td class="actions">
    <a href="/admin/signers/{id}/qr">QR</a>
    <form method="post" action="/admin/signers/{id}/toggle"><button type="submit">{toggle}</button></form>
  </td>
</tr>
"#,
                nama = escape_html(&signer.nama_lengkap),
                kegiatan = escape_html(&signer.no_kegiatan),
                terdaftar = format_long_date(signer.created_at.date_naive()),
                status = status_badge(signer.status),
                id = signer.id,
                toggle = toggle_label(signer.status),
            )
        })
        .collect();
    format!(
        r#"<table>
<tr><th>Nama Lengkap</th><th>No. Kegiatan</th><th>Terdaftar</th><th>Status</th><th>Aksi</th></tr>
{body}</table>"#
    )
}

pub fn signers_page(table: &str, error: Option<&str>) -> String {
    let body = format!(
        r#"<section class="card">
  <h1>Tambah Penandatangan</h1>
  {error}
  <form method="post" action="/admin/signers">
    <label for="nama_lengkap">Nama Lengkap</label>
    <input id="nama_lengkap" name="nama_lengkap" required />
    <label for="no_kegiatan">No. Kegiatan</label>
    <input id="no_kegiatan" name="no_kegiatan" required />
    <button type="submit">Simpan</button>
  </form>
</section>
<section class="card">
  <h2>Daftar Penandatangan</h2>
  {table}
</section>"#,
        error = error_banner(error),
    );
    admin_layout("Penandatangan", &body)
}

pub fn admin_error_page(message: &str) -> String {
    let body = format!(
        r#"<section class="card">
  {error}
  <p><a href="/admin/certificates">Kembali</a></p>
</section>"#,
        error = error_banner(Some(message)),
    );
    admin_layout("Terjadi Kesalahan", &body)
}

fn qr_figure(caption: &str, panel: &QrPanel) -> String {
    let data_url = panel.image.data_url();
    format!(
        r#"<figure>
  <figcaption><strong>{caption}</strong></figcaption>
  <img src="{data_url}" width="300" height="300" alt="{caption}" />
  <p><code>{url}</code></p>
  <a class="button" href="{data_url}" download="{filename}">Unduh QR</a>
</figure>"#,
        caption = escape_html(caption),
        url = escape_html(&panel.verification_url),
        filename = escape_html(&panel.filename),
    )
}

pub fn certificate_qr_page(qr: &CertificateQr) -> String {
    let body = format!(
        r#"<section class="card">
  <h1>QR Code Sertifikat {no}</h1>
  <p>{peserta} &middot; {kegiatan}</p>
  <div class="qr-grid">
{certificate}
{signer}
  </div>
  <p><a href="/admin/certificates">Kembali</a></p>
</section>"#,
        no = escape_html(&qr.certificate.no_sertifikat),
        peserta = escape_html(&qr.certificate.nama_peserta),
        kegiatan = escape_html(&qr.certificate.nama_kegiatan),
        certificate = qr_figure("QR Sertifikat", &qr.certificate_qr),
        signer = qr_figure(
            &format!("QR Tanda Tangan ({})", qr.signer.nama_lengkap),
            &qr.signer_qr
        ),
    );
    admin_layout("QR Code Sertifikat", &body)
}

pub fn signer_qr_page(signer: &signers::Model, panel: &QrPanel) -> String {
    let body = format!(
        r#"<section class="card">
  <h1>QR Tanda Tangan</h1>
  <p>{nama} &middot; {kegiatan}</p>
  <div class="qr-grid">
{figure}
  </div>
  <p><a href="/admin/signers">Kembali</a></p>
</section>"#,
        nama = escape_html(&signer.nama_lengkap),
        kegiatan = escape_html(&signer.no_kegiatan),
        figure = qr_figure("QR Tanda Tangan", panel),
    );
    admin_layout("QR Tanda Tangan", &body)
}
