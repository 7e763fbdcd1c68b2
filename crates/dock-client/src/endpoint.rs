use std::fmt;

/// HTTP endpoint paths of the Dock backend.
pub mod endpoints {
    pub const MANIFEST: &str = "/manifest";
    pub const SUBMIT: &str = "/submit";
    pub const RETURN: &str = "/return";
    pub const RETURN_EQUIPMENT: &str = "/return-equipment";
}

/// Query parameter carrying the wave number on `GET /manifest`.
pub const WAVE_NUMBER_PARAM: &str = "waveNumber";

/// The four remote calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Manifest,
    Submit,
    Return,
    ReturnEquipment,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Manifest => endpoints::MANIFEST,
            Self::Submit => endpoints::SUBMIT,
            Self::Return => endpoints::RETURN,
            Self::ReturnEquipment => endpoints::RETURN_EQUIPMENT,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
