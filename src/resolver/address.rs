use ethers::{types::Address, utils::to_checksum};

const ADDRESS_HEX_LEN: usize = 40;

/// Parse `0x` followed by 40 hex digits, in any letter case.
pub fn parse_hex_address(input: &str) -> Option<Address> {
    let digits = input.strip_prefix("0x")?;
    if digits.len() != ADDRESS_HEX_LEN {
        return None;
    }

    let bytes = hex::decode(digits).ok()?;
    Some(Address::from_slice(&bytes))
}

/// Parse a user-typed address. All-lowercase and all-uppercase digits are
/// accepted as is; mixed case must be a valid EIP-55 checksum.
pub fn parse_literal_address(input: &str) -> Option<Address> {
    let address = parse_hex_address(input)?;
    let digits = &input[2..];

    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && checksum(&address) != input {
        return None;
    }

    Some(address)
}

pub fn is_literal_address(input: &str) -> bool {
    parse_literal_address(input).is_some()
}

/// EIP-55 mixed-case representation.
pub fn checksum(address: &Address) -> String {
    to_checksum(address, None)
}
