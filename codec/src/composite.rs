//! Record codecs built from field codecs.
//!
//! A composite codec pairs each field codec with an accessor that borrows the
//! field from the record, plus a constructor that rebuilds the record from the
//! decoded fields. Fields are written in argument order; that order is part of
//! the wire contract.
//!
//! ```
//! use buffer::ByteReader;
//! use codec::{composite2, encode_to_vec, Codec, VarInt, F64};
//!
//! #[derive(Debug, PartialEq)]
//! struct Slot {
//!     index: i32,
//!     weight: f64,
//! }
//!
//! let codec = composite2(
//!     VarInt,
//!     |s: &Slot| &s.index,
//!     F64,
//!     |s: &Slot| &s.weight,
//!     |index, weight| Slot { index, weight },
//! );
//!
//! let slot = Slot { index: 3, weight: 0.5 };
//! let bytes = encode_to_vec(&codec, &slot).unwrap();
//! assert_eq!(codec.decode(&mut ByteReader::new(&bytes)).unwrap(), slot);
//! ```

use std::marker::PhantomData;

use buffer::{ByteReader, ByteWriter};

use crate::codec::Codec;
use crate::error::CodecResult;

macro_rules! composite {
    ($(#[$meta:meta])* $name:ident, $ctor:ident; $(($t:ident, $c:ident, $g:ident, $idx:tt, $field:ident, $get:ident)),+) => {
        $(#[$meta])*
        pub struct $name<S, $($t, $c, $g,)+ B> {
            fields: ($(($c, $g),)+),
            build: B,
            _marker: PhantomData<fn() -> (S, $($t,)+)>,
        }

        #[doc = concat!("Builds a [`", stringify!($name), "`].")]
        #[allow(clippy::too_many_arguments)]
        pub fn $ctor<S, $($t, $c, $g,)+ B>(
            $($field: $c, $get: $g,)+
            build: B,
        ) -> $name<S, $($t, $c, $g,)+ B>
        where
            $($c: Codec<$t>, $g: Fn(&S) -> &$t,)+
            B: Fn($($t),+) -> S,
        {
            $name {
                fields: ($(($field, $get),)+),
                build,
                _marker: PhantomData,
            }
        }

        impl<S, $($t, $c, $g,)+ B> Codec<S> for $name<S, $($t, $c, $g,)+ B>
        where
            $($c: Codec<$t>, $g: Fn(&S) -> &$t,)+
            B: Fn($($t),+) -> S,
        {
            fn encode(&self, value: &S, buf: &mut ByteWriter) -> CodecResult<()> {
                $( self.fields.$idx.0.encode((self.fields.$idx.1)(value), buf)?; )+
                Ok(())
            }

            fn decode(&self, buf: &mut ByteReader<'_>) -> CodecResult<S> {
                $( let $field = self.fields.$idx.0.decode(buf)?; )+
                Ok((self.build)($($field),+))
            }
        }
    };
}

composite!(
    /// Codec for a record with one field.
    Composite1, composite1;
    (T1, C1, G1, 0, c1, get1)
);
composite!(
    /// Codec for a record with two fields.
    Composite2, composite2;
    (T1, C1, G1, 0, c1, get1),
    (T2, C2, G2, 1, c2, get2)
);
composite!(
    /// Codec for a record with three fields.
    Composite3, composite3;
    (T1, C1, G1, 0, c1, get1),
    (T2, C2, G2, 1, c2, get2),
    (T3, C3, G3, 2, c3, get3)
);
composite!(
    /// Codec for a record with four fields.
    Composite4, composite4;
    (T1, C1, G1, 0, c1, get1),
    (T2, C2, G2, 1, c2, get2),
    (T3, C3, G3, 2, c3, get3),
    (T4, C4, G4, 3, c4, get4)
);
composite!(
    /// Codec for a record with five fields.
    Composite5, composite5;
    (T1, C1, G1, 0, c1, get1),
    (T2, C2, G2, 1, c2, get2),
    (T3, C3, G3, 2, c3, get3),
    (T4, C4, G4, 3, c4, get4),
    (T5, C5, G5, 4, c5, get5)
);
composite!(
    /// Codec for a record with six fields.
    Composite6, composite6;
    (T1, C1, G1, 0, c1, get1),
    (T2, C2, G2, 1, c2, get2),
    (T3, C3, G3, 2, c3, get3),
    (T4, C4, G4, 3, c4, get4),
    (T5, C5, G5, 4, c5, get5),
    (T6, C6, G6, 5, c6, get6)
);
composite!(
    /// Codec for a record with seven fields.
    Composite7, composite7;
    (T1, C1, G1, 0, c1, get1),
    (T2, C2, G2, 1, c2, get2),
    (T3, C3, G3, 2, c3, get3),
    (T4, C4, G4, 3, c4, get4),
    (T5, C5, G5, 4, c5, get5),
    (T6, C6, G6, 5, c6, get6),
    (T7, C7, G7, 6, c7, get7)
);
composite!(
    /// Codec for a record with eight fields.
    Composite8, composite8;
    (T1, C1, G1, 0, c1, get1),
    (T2, C2, G2, 1, c2, get2),
    (T3, C3, G3, 2, c3, get3),
    (T4, C4, G4, 3, c4, get4),
    (T5, C5, G5, 4, c5, get5),
    (T6, C6, G6, 5, c6, get6),
    (T7, C7, G7, 6, c7, get7),
    (T8, C8, G8, 7, c8, get8)
);
