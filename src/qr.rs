use base64::{Engine as _, engine::general_purpose::STANDARD};
use qrcode::{QrCode, render::svg};
use uuid::Uuid;

/// memorial_qr_data_uri
///
/// Renders the QR code for a memorial's canonical detail-page URL
/// (`{client_url}/memorial/{id}`) as an SVG wrapped in a `data:` URI, ready to
/// be cached on the record and dropped straight into an `<img>` tag. Requires
/// the record's assigned id, which is why creation is a two-step sequence:
/// insert first, attach the QR payload second.
pub fn memorial_qr_data_uri(client_url: &str, memorial_id: Uuid) -> Result<String, qrcode::types::QrError> {
    let link = format!(
        "{}/memorial/{}",
        client_url.trim_end_matches('/'),
        memorial_id
    );

    let code = QrCode::new(link.as_bytes())?;
    let image = code
        .render::<svg::Color>()
        .min_dimensions(240, 240)
        .build();

    Ok(format!(
        "data:image/svg+xml;base64,{}",
        STANDARD.encode(image)
    ))
}
