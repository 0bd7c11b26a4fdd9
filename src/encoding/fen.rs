use crate::error::{NnError, Result};

/// Length of an encoded position.
pub const FEATURE_COUNT: usize = 72;

/// Column names of an encoded position, in feature order.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "A8", "B8", "C8", "D8", "E8", "F8", "G8", "H8",
    "A7", "B7", "C7", "D7", "E7", "F7", "G7", "H7",
    "A6", "B6", "C6", "D6", "E6", "F6", "G6", "H6",
    "A5", "B5", "C5", "D5", "E5", "F5", "G5", "H5",
    "A4", "B4", "C4", "D4", "E4", "F4", "G4", "H4",
    "A3", "B3", "C3", "D3", "E3", "F3", "G3", "H3",
    "A2", "B2", "C2", "D2", "E2", "F2", "G2", "H2",
    "A1", "B1", "C1", "D1", "E1", "F1", "G1", "H1",
    "Active Player",
    "White Kingside Castling Right",
    "White Queenside Castling Right",
    "Black Kingside Castling Right",
    "Black Queenside Castling Right",
    "En passant Target",
    "Halfmove Clock",
    "Fullmove Number",
];

pub fn feature_columns() -> Vec<String> {
    FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect()
}

fn piece_value(c: char) -> Option<f64> {
    let magnitude = match c.to_ascii_lowercase() {
        'p' => 1.0,
        'n' => 2.0,
        'b' => 3.0,
        'r' => 4.0,
        'q' => 5.0,
        'k' => 6.0,
        _ => return None,
    };
    Some(if c.is_ascii_uppercase() { magnitude } else { -magnitude })
}

/// Encodes a FEN position into the 72 network features.
///
/// Layout: 64 squares from A8 to H1 (pawn 1 … king 6, negative for black,
/// 0 for empty), active player (+1 white, -1 black), castling rights
/// K Q k q (1 or 0), en-passant square index with a1 = 0 (-1 if none),
/// halfmove clock, fullmove number. Missing clock fields default to 0 and 1.
pub fn encode_fen(fen: &str) -> Result<Vec<f64>> {
    let err = |reason: &str| NnError::Fen { fen: fen.to_string(), reason: reason.to_string() };

    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() < 4 || fields.len() > 6 {
        return Err(err("expected 4 to 6 space-separated fields"));
    }

    let mut features = Vec::with_capacity(FEATURE_COUNT);

    let ranks: Vec<&str> = fields[0].split('/').collect();
    if ranks.len() != 8 {
        return Err(err("piece placement must have 8 ranks"));
    }
    for rank in ranks {
        let mut width = 0;
        for c in rank.chars() {
            if let Some(skip) = c.to_digit(10) {
                if skip == 0 || skip > 8 {
                    return Err(err("empty-square run must be 1 to 8"));
                }
                features.extend(std::iter::repeat(0.0).take(skip as usize));
                width += skip as usize;
            } else {
                features.push(piece_value(c).ok_or_else(|| err("unknown piece letter"))?);
                width += 1;
            }
        }
        if width != 8 {
            return Err(err("every rank must cover 8 squares"));
        }
    }

    features.push(match fields[1] {
        "w" => 1.0,
        "b" => -1.0,
        _ => return Err(err("active colour must be 'w' or 'b'")),
    });

    let castling = fields[2];
    if castling != "-" && !castling.chars().all(|c| "KQkq".contains(c)) {
        return Err(err("castling field may only contain K, Q, k, q or '-'"));
    }
    for right in ['K', 'Q', 'k', 'q'] {
        features.push(if castling.contains(right) { 1.0 } else { 0.0 });
    }

    features.push(match fields[3] {
        "-" => -1.0,
        square => square_index(square).ok_or_else(|| err("invalid en-passant square"))? as f64,
    });

    let halfmove = match fields.get(4) {
        Some(v) => v.parse::<u32>().map_err(|_| err("halfmove clock must be a non-negative integer"))?,
        None => 0,
    };
    let fullmove = match fields.get(5) {
        Some(v) => v.parse::<u32>().map_err(|_| err("fullmove number must be a non-negative integer"))?,
        None => 1,
    };
    features.push(halfmove as f64);
    features.push(fullmove as f64);

    Ok(features)
}

/// Algebraic square to index, a1 = 0 … h8 = 63.
fn square_index(square: &str) -> Option<usize> {
    let mut chars = square.chars();
    let file = chars.next()?;
    let rank = chars.next()?;
    if chars.next().is_some() || !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
        return None;
    }
    Some((rank as usize - '1' as usize) * 8 + (file as usize - 'a' as usize))
}
