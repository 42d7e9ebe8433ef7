use billed_core::Route;

/// Router seam: resolves a route key into an actual view transition.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Opens a receipt image in a preview overlay.
pub trait ReceiptPreview: Send + Sync {
    fn open_preview(&self, file_url: &str);
}
