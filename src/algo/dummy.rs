use crate::algo::Algorithm;

/// Pass-through algorithm: copies the source block into the destination
/// untouched. Performs no signal processing; useful as a template for real
/// algorithms and for validating the plugin plumbing end to end.
pub struct Dummy;

impl Algorithm for Dummy {
    fn init(&mut self) {
        log::debug!("dummy: init");
    }

    fn close(&mut self) {
        log::debug!("dummy: close");
    }

    fn transfer(&mut self, dst: &mut [u8], src: &[u8]) -> usize {
        let len = src.len().min(dst.len());
        dst[..len].copy_from_slice(&src[..len]);
        len
    }
}
