//! Topic classification for curated entries.
//!
//! Maps an item's arXiv category tags and title keywords onto one of five
//! fixed Chinese topic labels. Deterministic and total: every input gets
//! a label.

/// Chips & hardware architecture.
pub const TOPIC_HARDWARE: &str = "芯片与硬件架构";
/// Multimodal & perception.
pub const TOPIC_MULTIMODAL: &str = "多模态与感知";
/// Evaluation, safety & alignment.
pub const TOPIC_SAFETY: &str = "评测、安全与对齐";
/// Agent & reasoning paradigms.
pub const TOPIC_AGENT: &str = "Agent与推理范式";
/// Models & learning algorithms (default).
pub const TOPIC_MODELS: &str = "模型与学习算法";

/// Title keywords that mark a paper as hardware-related.
const HARDWARE_HINTS: [&str; 6] = ["asic", "fpga", "chip", "chiplet", "accelerator", "hbm"];

/// Category tags covering vision, language, image/video, and audio/speech.
const PERCEPTION_CATEGORIES: [&str; 4] = ["cs.cv", "cs.cl", "eess.iv", "eess.as"];

/// Map category tags and a title to a topic label. First match wins.
///
/// The hardware check runs before the topical category checks: hardware
/// signal is rarer and higher-value, so a `cs.CV` paper titled
/// "ASIC co-design ..." still lands in the hardware topic.
pub fn map_topic<S: AsRef<str>>(categories: &[S], title: &str) -> &'static str {
    let categories: Vec<String> = categories
        .iter()
        .map(|c| c.as_ref().to_lowercase())
        .collect();
    let title = title.to_lowercase();

    if categories.iter().any(|c| c == "cs.ar")
        || HARDWARE_HINTS.iter().any(|k| title.contains(k))
    {
        return TOPIC_HARDWARE;
    }
    if categories
        .iter()
        .any(|c| PERCEPTION_CATEGORIES.contains(&c.as_str()))
    {
        return TOPIC_MULTIMODAL;
    }
    if categories.iter().any(|c| c == "cs.cr") {
        return TOPIC_SAFETY;
    }
    if categories.iter().any(|c| c == "cs.ma") {
        return TOPIC_AGENT;
    }
    TOPIC_MODELS
}
