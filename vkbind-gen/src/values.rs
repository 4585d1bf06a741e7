//! Extension-token value and bitpos-to-hex formulas (`spec.md` §4.E),
//! grounded on `vkbBuildCalculateExtensionEnumValue` /
//! `vkbBuildBitPosToHexString[Ex]` in the original C generator.

/// `value = dir_sign * (1_000_000_000 + (extnumber - 1) * 1000 + offset)`.
pub fn extension_enum_value(extnumber: u32, offset: u32, dir_negative: bool) -> i64 {
    let magnitude = 1_000_000_000i64 + (extnumber as i64 - 1) * 1000 + offset as i64;
    if dir_negative {
        -magnitude
    } else {
        magnitude
    }
}

/// `0x{1<<b:08x}` for a 32-bit enum container.
pub fn bitpos_hex32(bitpos: u8) -> String {
    format!("0x{:08x}", 1u32 << bitpos)
}

/// VC6-safe cast+shift form for a 64-bit flag container, e.g.
/// `(T)(((T)0x00000001 << 32) | (0x00000000))` for `bitpos = 32`.
pub fn bitpos_hex64_vc6_safe(type_name: &str, bitpos: u8) -> String {
    format!(
        "({t})((({t})0x00000001 << {b}) | (0x00000000))",
        t = type_name,
        b = bitpos
    )
}

/// Strips a known vendor tag suffix from `name`, returning `(stem, tag)`.
pub fn split_vendor_tag<'a>(name: &'a str, tags: &[&str]) -> (&'a str, Option<&'a str>) {
    for tag in tags {
        if let Some(stem) = name.strip_suffix(tag) {
            return (stem, Some(tag));
        }
    }
    (name, None)
}

/// Synthesizes the `_MAX_ENUM[_VENDOR]` token for an enum typename:
/// strip the vendor tag, uppercase-underscorize the remainder, append
/// `_MAX_ENUM`, then re-append the tag (`vkbExtractTagFromName` /
/// `vkbGenerateMaxEnumToken`).
pub fn max_enum_token(type_name: &str, tags: &[&str]) -> String {
    let (stem, tag) = split_vendor_tag(type_name, tags);
    let mut underscored = String::new();
    for (i, c) in stem.char_indices() {
        if c.is_uppercase() && i != 0 && !stem.as_bytes()[i - 1].is_ascii_uppercase() {
            underscored.push('_');
        }
        underscored.push(c.to_ascii_uppercase());
    }
    underscored.push_str("_MAX_ENUM");
    if let Some(tag) = tag {
        underscored.push('_');
        underscored.push_str(tag);
    }
    underscored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_value_formula_negative_direction() {
        // Scenario B (spec.md §8): extnumber 42, offset 3, dir "-".
        assert_eq!(extension_enum_value(42, 3, true), -1_000_041_003);
    }

    #[test]
    fn extension_value_formula_positive_direction() {
        assert_eq!(extension_enum_value(1, 0, false), 1_000_000_000);
    }

    #[test]
    fn bitpos_32_hex_matches_shift() {
        assert_eq!(bitpos_hex32(0), "0x00000001");
        assert_eq!(bitpos_hex32(8), "0x00000100");
    }

    #[test]
    fn bitpos_64_vc6_safe_form() {
        // Scenario C (spec.md §8).
        assert_eq!(
            bitpos_hex64_vc6_safe("VkFlags64", 32),
            "(VkFlags64)(((VkFlags64)0x00000001 << 32) | (0x00000000))"
        );
    }

    #[test]
    fn max_enum_token_strips_and_reappends_vendor_tag() {
        assert_eq!(
            max_enum_token("VkSomeEnumKHR", &["KHR", "EXT"]),
            "VK_SOME_ENUM_MAX_ENUM_KHR"
        );
        assert_eq!(max_enum_token("VkResult", &["KHR", "EXT"]), "VK_RESULT_MAX_ENUM");
    }
}
