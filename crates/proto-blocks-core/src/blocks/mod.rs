//! The built-in block renderers.

pub mod card;
pub mod header_nav;
pub mod hero;
pub mod stats;
pub mod testimonial;

pub use card::{Card, CardAttributes, CardLayout, ImagePosition};
pub use header_nav::{HeaderNav, HeaderNavAttributes, NavItem};
pub use hero::{ContentAlignment, Hero, HeroAttributes, VerticalAlignment};
pub use stats::{StatItem, Stats, StatsAttributes, StatsStyle};
pub use testimonial::{Testimonial, TestimonialAttributes, TestimonialStyle};
