//! Fixed lookup tables consulted by the parser and the renderer.

// NMOS 6502 plus `ina`
#[rustfmt::skip]
const NMOS: &[&str] = &[
    "ADC", "AND", "ASL", "BCC", "BCS", "BEQ", "BIT", "BMI", "BNE", "BPL",
    "BRK", "BVC", "BVS", "CLC", "CLD", "CLI", "CLV", "CMP", "CPX", "CPY",
    "DEC", "DEX", "DEY", "EOR", "INA", "INC", "INX", "INY", "JMP", "JSR",
    "LDA", "LDX", "LDY", "LSR", "NOP", "ORA", "PHA", "PHP", "PLA", "PLP",
    "ROL", "ROR", "RTI", "RTS", "SBC", "SEC", "SED", "SEI", "STA", "STX",
    "STY", "TAX", "TAY", "TSX", "TXA", "TXS", "TYA",
];

// WDC 65C02 extensions
#[rustfmt::skip]
const CMOS: &[&str] = &[
    "BBR0", "BBR1", "BBR2", "BBR3", "BBR4", "BBR5", "BBR6", "BBR7",
    "BBS0", "BBS1", "BBS2", "BBS3", "BBS4", "BBS5", "BBS6", "BBS7",
    "BRA", "PHX", "PHY", "PLX", "PLY",
    "RMB0", "RMB1", "RMB2", "RMB3", "RMB4", "RMB5", "RMB6", "RMB7",
    "SMB0", "SMB1", "SMB2", "SMB3", "SMB4", "SMB5", "SMB6", "SMB7",
    "STP", "STZ", "TRB", "TSB", "WAI",
];

/// Directives that stay in column one instead of the statement column.
const COLUMN_ONE: &[&str] = &["segment", "zeropage", "data", "code", "bss"];

/// Case-insensitive membership in the 6502/65C02 instruction set.
pub fn is_mnemonic(name: &str) -> bool {
    // longest mnemonic is 4 chars, anything else can't match
    if name.len() > 4 {
        return false;
    }
    let upper = name.to_ascii_uppercase();
    NMOS.contains(&upper.as_str()) || CMOS.contains(&upper.as_str())
}

pub fn is_column_one(directive: &str) -> bool {
    COLUMN_ONE
        .iter()
        .any(|name| name.eq_ignore_ascii_case(directive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_sizes() {
        assert_eq!(NMOS.len() + CMOS.len(), 99);
    }

    #[test]
    fn mnemonics_match_any_case() {
        assert!(is_mnemonic("lda"));
        assert!(is_mnemonic("LdA"));
        assert!(is_mnemonic("bbr3"));
        assert!(is_mnemonic("STZ"));
        assert!(!is_mnemonic("ldaa"));
        assert!(!is_mnemonic("brl"));
        assert!(!is_mnemonic("my_macro"));
        assert!(!is_mnemonic(""));
    }

    #[test]
    fn column_one_directives() {
        assert!(is_column_one("segment"));
        assert!(is_column_one("ZEROPAGE"));
        assert!(is_column_one("Bss"));
        assert!(!is_column_one("byte"));
        assert!(!is_column_one("segments"));
    }
}
