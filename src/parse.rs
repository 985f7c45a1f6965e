/// Parses a fixed-point decimal with one fractional digit into tenths.
///
/// `b"-12.3"` becomes `-123`. Every byte that is not `-` or `.` is treated
/// as a digit; malformed input yields an unspecified number rather than an
/// error.
#[inline(always)]
pub fn parse_fixed(bytes: &[u8]) -> i64 {
    let mut negative = false;
    let mut num: i64 = 0;
    for &b in bytes {
        match b {
            b'-' => negative = true,
            b'.' => {}
            _ => num = num.wrapping_mul(10).wrapping_add(b.wrapping_sub(b'0') as i64),
        }
    }
    if negative {
        -num
    } else {
        num
    }
}
