//! Recommendation selection
//!
//! Static advice lists, one per stress level, in display order.

use crate::types::StressLevel;

const LOW: [&str; 3] = [
    "Maintain your current healthy routines",
    "Practice regular mindfulness to stay centered",
    "Continue with moderate exercise 3-5 times weekly",
];

const MODERATE: [&str; 4] = [
    "Take short breaks throughout your day",
    "Try guided meditation for 10 minutes daily",
    "Ensure you're getting 7-8 hours of sleep",
    "Consider limiting caffeine intake",
];

const HIGH: [&str; 5] = [
    "Prioritize sleep and rest periods",
    "Practice deep breathing exercises multiple times daily",
    "Reduce commitments where possible",
    "Engage in physical activity to release tension",
    "Consider speaking with a trusted friend or family member",
];

const SEVERE: [&str; 6] = [
    "Speak with a healthcare professional",
    "Focus on basic self-care: sleep, nutrition, and hydration",
    "Try progressive muscle relaxation techniques",
    "Take time off from stressful activities if possible",
    "Connect with supportive friends or family",
    "Consider professional mental health resources",
];

/// Advice for a stress level
pub fn recommendations_for(level: StressLevel) -> &'static [&'static str] {
    match level {
        StressLevel::Low => &LOW,
        StressLevel::Moderate => &MODERATE,
        StressLevel::High => &HIGH,
        StressLevel::Severe => &SEVERE,
    }
}
