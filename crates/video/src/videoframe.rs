use {image::Image, std::time::SystemTime};

#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub image: Image,
    pub captured_at: SystemTime,
}

impl VideoFrame {
    pub fn new(image: Image) -> Self {
        Self {
            image,
            captured_at: SystemTime::now(),
        }
    }
}
