//! Seam for the per-request anti-forgery token source.

/// Issues the anti-forgery token embedded in rendered forms.
///
/// `R` is whatever the web layer uses to identify the current request or
/// visitor. The renderer treats the returned token as an opaque string and
/// asks for a new one on every render.
pub trait TokenIssuer<R: ?Sized> {
    fn issue(&self, request: &R) -> String;
}

impl<R, F> TokenIssuer<R> for F
where
    R: ?Sized,
    F: Fn(&R) -> String,
{
    fn issue(&self, request: &R) -> String {
        self(request)
    }
}
