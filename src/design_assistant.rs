//! Boundary to the generative design assistant.
//!
//! The crate ships no client. Hosts implement [`DesignAssistant`] over
//! whatever text and image model they use, and [`DesignConsultant`] turns
//! every failure into the fixed fallback shown to visitors. [`RequestGuard`]
//! lets the host drop a response that arrives after a newer request was made.

use log::warn;

use crate::app_response::AppResponse;

pub const CONCEPT_EMPTY_FALLBACK: &str =
    "Maaf, kami sedang mengalami gangguan koneksi ke AI Designer.";
pub const CONCEPT_ERROR_FALLBACK: &str =
    "Maaf, terjadi kesalahan saat menghubungi asisten desain kami.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    /// Base64 encoded image bytes.
    pub data: String,
}

impl ImagePayload {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

pub trait DesignAssistant {
    /// Marked-up design concept, or `None` when the model returned no text.
    fn design_concept(&self, prompt: &str) -> Result<Option<String>, AppResponse>;

    /// First inline image of the response, if any.
    fn booth_image(&self, prompt: &str) -> Result<Option<ImagePayload>, AppResponse>;
}

pub fn concept_prompt(business_idea: &str) -> String {
    format!(
        "Bertindaklah sebagai konsultan desain booth dan branding profesional. \
         Pengguna ingin membuat usaha dengan deskripsi: \"{business_idea}\".\n\n\
         Berikan jawaban singkat, kreatif, dan inspiratif yang mencakup:\n\
         1. Konsep Visual (Warna, Gaya, Nuansa)\n\
         2. Saran Material yang cocok\n\
         3. Ide fitur unik untuk gerobak/booth tersebut agar menarik perhatian pembeli.\n\n\
         Gunakan format HTML sederhana (gunakan tag <p>, <ul>, <li>, <strong>) untuk styling output, \
         jangan gunakan markdown. Bahasa Indonesia."
    )
}

pub fn image_prompt(description: &str) -> String {
    format!(
        "Buatkan gambar desain visual 3D yang realistis dan menarik untuk sebuah booth, gerobak, \
         atau kios usaha berdasarkan deskripsi ini: \"{description}\".\n\
         Pastikan gambar terlihat profesional, pencahayaan bagus, dan menampilkan bentuk booth \
         dengan jelas. Style: Modern, 3D Render, Architectural Visualization."
    )
}

pub struct DesignConsultant<A> {
    assistant: A,
}

impl<A: DesignAssistant> DesignConsultant<A> {
    pub fn new(assistant: A) -> Self {
        Self { assistant }
    }

    /// Never fails; errors and empty answers become a fallback message.
    pub fn generate_concept(&self, business_idea: &str) -> String {
        match self.assistant.design_concept(&concept_prompt(business_idea)) {
            Ok(Some(text)) if !text.trim().is_empty() => text,
            Ok(_) => CONCEPT_EMPTY_FALLBACK.to_string(),
            Err(e) => {
                warn!("Design concept request failed: {e}");
                CONCEPT_ERROR_FALLBACK.to_string()
            }
        }
    }

    /// Embeddable data URI, or `None` on any failure.
    pub fn generate_image(&self, description: &str) -> Option<String> {
        match self.assistant.booth_image(&image_prompt(description)) {
            Ok(image) => image.map(|payload| payload.data_uri()),
            Err(e) => {
                warn!("Booth image request failed: {e}");
                None
            }
        }
    }
}

/// Ticket identifying one request issued through a [`RequestGuard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// Tracks the newest request so superseded responses can be discarded.
#[derive(Debug, Clone, Default)]
pub struct RequestGuard {
    latest: u64,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersedes every ticket issued before.
    pub fn issue(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Passes `response` through only if `ticket` is still the newest one.
    pub fn accept<T>(&self, ticket: RequestTicket, response: T) -> Option<T> {
        self.is_current(ticket).then_some(response)
    }
}
