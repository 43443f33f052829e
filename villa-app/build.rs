use shadow_rs::{BuildPattern, ShadowBuilder};

// Version metadata for the `x-version-id` header.
fn main() -> shadow_rs::SdResult<()> {
    ShadowBuilder::builder()
        .build_pattern(BuildPattern::Lazy)
        .build()
        .map(|_| ())
}
