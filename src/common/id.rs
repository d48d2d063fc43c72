use rand::Rng;

/// Generate a random RFC4122 v4 GUID as raw 16 bytes
pub fn generate_guid_bytes() -> [u8; 16] {
    let mut bytes = [0u8; 16];
    let mut rng = rand::rng();
    rng.fill(&mut bytes);
    // RFC4122 v4
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    bytes
}

/// Generate a random GUID in the form xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx
pub fn generate_guid() -> String {
    let bytes = generate_guid_bytes();
    format_guid(&bytes)
}

/// Format raw GUID bytes as xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx
pub fn format_guid(bytes: &[u8; 16]) -> String {
    let mut out = String::with_capacity(36);
    for (i, b) in bytes.iter().enumerate() {
        if matches!(i, 4 | 6 | 8 | 10) {
            out.push('-');
        }
        out.push_str(&format!("{:02x}", b));
    }
    out
}
