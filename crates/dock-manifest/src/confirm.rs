use dock_types::DispatchRequest;

/// The operator's final go/no-go before a dispatch is sent.
pub trait DispatchConfirmation {
    fn confirm(&self, request: &DispatchRequest) -> bool;
}

impl<F> DispatchConfirmation for F
where
    F: Fn(&DispatchRequest) -> bool,
{
    fn confirm(&self, request: &DispatchRequest) -> bool {
        self(request)
    }
}

/// Confirms every dispatch, for non-interactive use.
#[derive(Clone, Copy, Debug, Default)]
pub struct Preconfirmed;

impl DispatchConfirmation for Preconfirmed {
    fn confirm(&self, _request: &DispatchRequest) -> bool {
        true
    }
}
