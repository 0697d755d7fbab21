//! Parsers to read structured data from the /proc directory

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::procfs::ProcfsError;

pub mod system;

/// Type which can be parsed from a `TokenParser`
pub trait Parse: Sized {
    fn parse(token_parser: &TokenParser) -> Result<Self, ProcfsError>;
}

/// Specialization of a `Parse` type which is read from a system file (directly in `/proc`)
pub trait SystemData: Parse {
    fn filepath() -> PathBuf;
}

/// Type which can read a `SystemData`
pub trait ReadSystemData<D>
where
    D: SystemData + Sized,
{
    fn read(&mut self) -> Result<D, ProcfsError>;
}

/// Reads data from procfs system files
///
/// The file is kept open, and read again from its start on each call to `read()`.
pub struct SystemDataReader<D>
where
    D: SystemData + Sized,
{
    reader: DataReader<File, D>,
}

impl<D> SystemDataReader<D>
where
    D: SystemData + Sized,
{
    pub fn new() -> Result<Self, ProcfsError> {
        Self::from_path(D::filepath().as_path())
    }

    /// Reads the data from another file than its default one in `/proc`
    pub fn from_path(filepath: &Path) -> Result<Self, ProcfsError> {
        let file = File::open(filepath)?;

        Ok(SystemDataReader {
            reader: DataReader::new(file),
        })
    }
}

impl<D> ReadSystemData<D> for SystemDataReader<D>
where
    D: SystemData + Sized,
{
    fn read(&mut self) -> Result<D, ProcfsError> {
        self.reader.read()
    }
}

struct DataReader<R, D>
where
    R: Read + Seek,
    D: Parse + Sized,
{
    src: R,
    content: String,
    phantom: PhantomData<D>,
}

impl<R, D> DataReader<R, D>
where
    R: Read + Seek,
    D: Parse + Sized,
{
    pub fn new(src: R) -> Self {
        DataReader {
            src,
            content: String::new(),
            phantom: PhantomData,
        }
    }

    pub fn read(&mut self) -> Result<D, ProcfsError> {
        self.src.seek(SeekFrom::Start(0))?;

        self.content.clear();
        self.src.read_to_string(&mut self.content)?;

        let tp = TokenParser::new(&self.content);

        D::parse(&tp)
    }
}


/// Parses space-separated token from a given multi-line string slice
pub struct TokenParser<'a> {
    lines: Vec<Vec<&'a str>>,
}

impl<'a> TokenParser<'a> {
    /// Builds a token parser from a string slice
    /// # Arguments
    ///  * `content` The string slice from which to parse tokens
    fn new(content: &'a str) -> TokenParser<'a> {
        let lines = content
            .lines()
            .map(|line| line.split_whitespace().collect())
            .collect();

        TokenParser { lines }
    }

    /// Amount of lines, including empty ones
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns all the tokens of a line
    fn line(&self, line_no: usize) -> Option<&[&'a str]> {
        self.lines.get(line_no).map(|tokens| tokens.as_slice())
    }

    /// Returns the number of the first line whose first token is `key`
    fn find_line(&self, key: &str) -> Option<usize> {
        self.lines.iter().position(|tokens| tokens.first() == Some(&key))
    }

    /// Get the value of a token from the parser
    /// # Arguments
    ///  * `line_no`: The line number from which to retrieve the token
    ///  * `pos`: The position of the token in the line (e.g. 1 for token 'b' in line 'a b c')
    fn token<T>(&self, line_no: usize, pos: usize) -> Result<T, ProcfsError>
    where
        T: FromStr,
    {
        self.lines
            .get(line_no)
            .ok_or_else(|| {
                let err_msg = format!("Could not get data at line {} and position {}", line_no, pos);
                ProcfsError::InvalidFileFormat(err_msg)
            })?
            .get(pos)
            .ok_or_else(|| {
                let err_msg = format!("Could not get token at line {} and position {}", line_no, pos);
                ProcfsError::InvalidFileFormat(err_msg)
            })
            .and_then(|token| Self::parse_token(token, line_no, pos))
    }

    /// Same as [`Self::token()`], but returns the default value of `T` if the token does not
    /// exist.
    /// Older kernels expose fewer columns in some files.
    fn optional_token<T>(&self, line_no: usize, pos: usize) -> Result<T, ProcfsError>
    where
        T: FromStr + Default,
    {
        match self.lines.get(line_no).and_then(|tokens| tokens.get(pos)) {
            Some(token) => Self::parse_token(token, line_no, pos),
            None => Ok(T::default()),
        }
    }

    fn parse_token<T>(token: &str, line_no: usize, pos: usize) -> Result<T, ProcfsError>
    where
        T: FromStr,
    {
        token.parse::<T>().map_err(|_| {
            let err_msg = format!("The token at line {} and position {} could not be parsed", line_no, pos);
            ProcfsError::InvalidFileContent(err_msg)
        })
    }
}

#[cfg(test)]
mod test_data_reader {
    use std::io::{Cursor, Write};

    use tempfile::NamedTempFile;

    use crate::procfs::parsers::{
        DataReader, Parse, ProcfsError, ReadSystemData, SystemData, SystemDataReader, TokenParser,
    };

    #[derive(PartialEq, Debug)]
    struct TestSystemData {
        field_1: u8,
        field_2: i16,
    }

    impl Parse for TestSystemData {
        fn parse(token_parser: &TokenParser) -> Result<Self, ProcfsError> {
            Ok(TestSystemData {
                field_1: token_parser.token(0, 0)?,
                field_2: token_parser.token(0, 1)?,
            })
        }
    }

    impl SystemData for TestSystemData {
        fn filepath() -> std::path::PathBuf {
            "/nonexistent".into()
        }
    }

    #[test]
    fn test_load_correctly_data() {
        let data_src = Cursor::new(b"12 -92 abc");

        let mut data_reader = DataReader::new(data_src);

        assert!(matches!(
            data_reader.read(),
            Ok(TestSystemData {
                field_1: 12,
                field_2: -92
            })
        ));
    }

    #[test]
    fn test_should_read_file_again_from_start() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "1 2").unwrap();
        let mut reader = SystemDataReader::<TestSystemData>::from_path(file.path()).unwrap();

        assert_eq!(reader.read().unwrap(), TestSystemData { field_1: 1, field_2: 2 });

        file.as_file_mut().set_len(0).unwrap();
        write!(file.reopen().unwrap(), "3 4").unwrap();

        assert_eq!(reader.read().unwrap(), TestSystemData { field_1: 3, field_2: 4 });
    }

    #[test]
    fn test_should_fail_when_file_does_not_exist() {
        let reader = SystemDataReader::<TestSystemData>::new();

        assert!(matches!(reader, Err(ProcfsError::IOError(_))));
    }
}
