/// Hint shown above the ball while scratching.
pub fn progress_message(progress: f64) -> &'static str {
    match progress {
        p if p < 10.0 => "Ну, почнемо магію...",
        p if p < 40.0 => "Ого, пішло тепло!",
        p if p < 70.0 => "Блищить, як лисина у Він Дізеля!",
        p if p < 90.0 => "Тільки не протри до зірок!",
        p if p < 100.0 => "Завантаження магії... 99%...",
        _ => "",
    }
}

/// Colour phase of the aura as the card heats up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyPhase {
    Blue,
    Purple,
    Gold,
    Critical,
}

impl EnergyPhase {
    pub fn from_progress(progress: f64) -> Self {
        match progress {
            p if p < 30.0 => Self::Blue,
            p if p < 70.0 => Self::Purple,
            p if p < 90.0 => Self::Gold,
            _ => Self::Critical,
        }
    }
}
