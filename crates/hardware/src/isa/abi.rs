//! MIPS register name table.
//!
//! Traces may spell registers by number (`$8`) or by ABI name (`$t0`).

/// ABI names for registers `$0`–`$31`.
const REG_NAMES: [&str; 32] = [
    "zero", "at", "v0", "v1", "a0", "a1", "a2", "a3", "t0", "t1", "t2", "t3", "t4", "t5", "t6",
    "t7", "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", "t8", "t9", "k0", "k1", "gp", "sp", "fp",
    "ra",
];

/// Returns the register number for an ABI name (`s8` is accepted for `fp`).
pub fn register_index(name: &str) -> Option<u8> {
    if name == "s8" {
        return Some(30);
    }
    REG_NAMES
        .iter()
        .position(|&n| n == name)
        .and_then(|i| u8::try_from(i).ok())
}
