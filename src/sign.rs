use std::fmt;
use std::ops::Neg;

/// The sign of a [`Word`](crate::Word). Kept as its own type (rather than a
/// bare `bool` or the integer's own sign) so that `+0` and `-0` remain
/// structurally distinguishable, per TAOCP's word model.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn of(n: i64) -> Sign {
        if n < 0 {
            Sign::Minus
        } else {
            Sign::Plus
        }
    }

    pub fn is_negative(self) -> bool {
        self == Sign::Minus
    }

    pub fn multiplier(self) -> i64 {
        match self {
            Sign::Plus => 1,
            Sign::Minus => -1,
        }
    }
}

impl Default for Sign {
    fn default() -> Sign {
        Sign::Plus
    }
}

impl Neg for Sign {
    type Output = Sign;

    fn neg(self) -> Sign {
        match self {
            Sign::Plus => Sign::Minus,
            Sign::Minus => Sign::Plus,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Sign::Plus => "+",
            Sign::Minus => "-",
        })
    }
}
