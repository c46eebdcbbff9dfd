/// Backend module - backend implementations shipped with the HAL

pub mod software;
