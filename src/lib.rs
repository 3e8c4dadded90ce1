pub mod bank;

use std::fmt;
use std::io;

/// Error type for patch bank operations and for loading bank files.
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum BankError {
    DuplicateProgram(i32),  // program number already in use
    BankFull,  // all 128 program numbers are taken
    InvalidIndex(usize, usize),  // actual, length
    MalformedFile(String),  // reason
    Io(String),  // reason
}

impl fmt::Display for BankError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            BankError::DuplicateProgram(program) => format!("Program number {} already exists.", program),
            BankError::BankFull => String::from("Patch limit reached, all program numbers are in use."),
            BankError::InvalidIndex(actual, length) => format!("Index {} is out of bounds, length is {}.", actual, length),
            BankError::MalformedFile(reason) => format!("Malformed patch bank file: {}", reason),
            BankError::Io(reason) => format!("Unable to access patch bank file: {}", reason),
        })
    }
}

impl std::error::Error for BankError {}

impl From<serde_json::Error> for BankError {
    fn from(error: serde_json::Error) -> Self {
        BankError::MalformedFile(error.to_string())
    }
}

impl From<io::Error> for BankError {
    fn from(error: io::Error) -> Self {
        BankError::Io(error.to_string())
    }
}

// Associated consts are declared in the trait without a value,
// and each implementor supplies its own range and default.
pub trait Ranged {
    const FIRST: i32;
    const LAST: i32;
    const DEFAULT: i32;

    fn new(value: i32) -> Self;
    fn value(&self) -> i32;
    fn contains(value: i32) -> bool;
    fn clamped(value: i32) -> Self;
    fn random() -> Self;
}

// The `ranged_impl` macro generates an implementation of the `Ranged` trait,
// along with implementations of the `Default` and `Display` traits and
// the `i32` conversions used for serialization, based on the values
// supplied as parameters (type name, first, last, default).
#[macro_export]
macro_rules! ranged_impl {
    ($typ:ty, $first:expr, $last:expr, $default:expr) => {
        impl $crate::Ranged for $typ {
            const FIRST: i32 = $first;
            const LAST: i32 = $last;
            const DEFAULT: i32 = $default;

            fn new(value: i32) -> Self {
                if Self::contains(value) {
                    Self(value)
                }
                else {
                    panic!("expected value in range [{}...{}], got {}",
                        Self::FIRST, Self::LAST, value);
                }
            }

            fn value(&self) -> i32 { self.0 }

            fn contains(value: i32) -> bool {
                value >= Self::FIRST && value <= Self::LAST
            }

            fn clamped(value: i32) -> Self {
                if !Self::contains(value) {
                    ::log::warn!("{} value {} out of range [{}...{}], clamping",
                        stringify!($typ), value, Self::FIRST, Self::LAST);
                }
                Self(::num::clamp(value, Self::FIRST, Self::LAST))
            }

            fn random() -> Self {
                use ::rand::Rng;
                let mut rng = ::rand::rng();
                Self::new(rng.random_range(Self::FIRST..=Self::LAST))
            }
        }

        impl Default for $typ {
            fn default() -> Self {
                <Self as $crate::Ranged>::new(<Self as $crate::Ranged>::DEFAULT)
            }
        }

        impl ::std::fmt::Display for $typ {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $typ {
            fn from(value: i32) -> Self {
                <Self as $crate::Ranged>::clamped(value)
            }
        }

        impl From<$typ> for i32 {
            fn from(item: $typ) -> i32 {
                item.0
            }
        }
    }
}
