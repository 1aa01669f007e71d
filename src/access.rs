use crate::error::FlagError;
use crate::flag::FlagDef;
use crate::registry::FlagSet;
use crate::value::ScalarValue;
use crate::valuation::Valuation;

impl FlagSet {
    /// Raw values resolved for `name`, possibly empty
    pub fn get(&self, name: &str) -> Result<&[String], FlagError> {
        self.lookup(name).map(FlagDef::values)
    }

    /// Whether the boolean flag `name` was set by any source
    pub fn get_bool(&self, name: &str) -> Result<bool, FlagError> {
        let def = self.lookup(name)?;
        if def.valuation() != Valuation::None {
            return Err(FlagError::WrongValuation {
                name: name.to_string(),
                valuation: def.valuation(),
                expected: "a boolean flag",
            });
        }
        Ok(def.is_set())
    }

    /// Every value of the mono or multi-valuated flag `name`, converted to `T`.
    ///
    /// Conversion is all or nothing: the first value that fails to parse is
    /// returned as [`FlagError::ParseError`].
    pub fn get_parsed<T: ScalarValue>(&self, name: &str) -> Result<Vec<T>, FlagError> {
        let def = self.lookup(name)?;
        if def.valuation() == Valuation::None {
            return Err(FlagError::WrongValuation {
                name: name.to_string(),
                valuation: def.valuation(),
                expected: "a mono or multi-valuated flag",
            });
        }
        def.values()
            .iter()
            .map(|raw| T::parse_scalar(name, raw))
            .collect()
    }

    pub fn get_string(&self, name: &str) -> Result<Vec<String>, FlagError> {
        self.get_parsed(name)
    }

    pub fn get_int(&self, name: &str) -> Result<Vec<isize>, FlagError> {
        self.get_parsed(name)
    }

    pub fn get_int8(&self, name: &str) -> Result<Vec<i8>, FlagError> {
        self.get_parsed(name)
    }

    pub fn get_int16(&self, name: &str) -> Result<Vec<i16>, FlagError> {
        self.get_parsed(name)
    }

    pub fn get_int32(&self, name: &str) -> Result<Vec<i32>, FlagError> {
        self.get_parsed(name)
    }

    pub fn get_int64(&self, name: &str) -> Result<Vec<i64>, FlagError> {
        self.get_parsed(name)
    }

    pub fn get_uint(&self, name: &str) -> Result<Vec<usize>, FlagError> {
        self.get_parsed(name)
    }

    pub fn get_uint8(&self, name: &str) -> Result<Vec<u8>, FlagError> {
        self.get_parsed(name)
    }

    pub fn get_uint16(&self, name: &str) -> Result<Vec<u16>, FlagError> {
        self.get_parsed(name)
    }

    pub fn get_uint32(&self, name: &str) -> Result<Vec<u32>, FlagError> {
        self.get_parsed(name)
    }

    pub fn get_uint64(&self, name: &str) -> Result<Vec<u64>, FlagError> {
        self.get_parsed(name)
    }

    /// Values as `f32`; a finite literal too large for `f32` is a parse error
    pub fn get_float32(&self, name: &str) -> Result<Vec<f32>, FlagError> {
        self.get_parsed(name)
    }

    pub fn get_float64(&self, name: &str) -> Result<Vec<f64>, FlagError> {
        self.get_parsed(name)
    }
}
