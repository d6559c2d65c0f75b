#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    SetValue { value: f64, animated: bool },
    SetMinimum(f64),
    SetMaximum(f64),
    SetContinuous(bool),
    ConfigReload,
}
