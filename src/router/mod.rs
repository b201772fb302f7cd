//! # Tabla de Rutas
//! src/router/mod.rs
//!
//! Mapea paths lógicos a archivos HTML.
//!
//! ```text
//! /index  → index.html
//! /path1  → path1.html
//! /path2  → path2.html
//! ```
//!
//! La tabla se construye una vez al arrancar y después solo se lee, así que
//! se comparte entre threads con un `Arc` sin ningún lock.
//! El lookup es exacto: sensible a mayúsculas, sin normalizar `/` final ni
//! separar query strings.

use crate::error::{Result, ServerError};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

/// Una ruta: path lógico → nombre de archivo
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Route {
    /// Path que debe llegar en el request line (ej: "/index")
    pub path: String,

    /// Archivo relativo al document root (ej: "index.html")
    pub file: String,
}

/// Formato del archivo `--routes`
///
/// ```json
/// {"routes": [{"path": "/index", "file": "index.html"}]}
/// ```
#[derive(Debug, Deserialize)]
struct RoutesFile {
    routes: Vec<Route>,
}

/// Tabla de rutas inmutable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    /// En orden de inserción; el primer match gana
    routes: Vec<Route>,
}

impl RouteTable {
    /// Crea una tabla a partir de pares (path, archivo)
    ///
    /// # Ejemplo
    /// ```
    /// use page_server::router::RouteTable;
    ///
    /// let table = RouteTable::new([("/hello", "hello.html")]);
    /// assert_eq!(table.resolve("/hello"), Some("hello.html"));
    /// assert_eq!(table.resolve("/Hello"), None);
    /// ```
    pub fn new<I, P, F>(routes: I) -> Self
    where
        I: IntoIterator<Item = (P, F)>,
        P: Into<String>,
        F: Into<String>,
    {
        Self {
            routes: routes
                .into_iter()
                .map(|(path, file)| Route {
                    path: path.into(),
                    file: file.into(),
                })
                .collect(),
        }
    }

    /// Carga la tabla desde un archivo JSON
    ///
    /// Falla si el archivo no existe, no es JSON válido o alguna ruta es
    /// inválida (ver [`RouteTable::validate`]).
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let routes_error = |reason: String| ServerError::Routes {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|e| routes_error(e.to_string()))?;
        let parsed: RoutesFile = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| routes_error(e.to_string()))?;

        let table = Self {
            routes: parsed.routes,
        };
        table.validate().map_err(routes_error)?;

        Ok(table)
    }

    /// Verifica que cada ruta tenga forma válida
    ///
    /// - El path empieza con `/`
    /// - El archivo es un nombre relativo sin componentes `..`
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.routes.is_empty() {
            return Err("route table is empty".to_string());
        }

        for route in &self.routes {
            if !route.path.starts_with('/') {
                return Err(format!("route path must start with '/': {}", route.path));
            }

            let file = Path::new(&route.file);
            let plain = !route.file.is_empty()
                && file
                    .components()
                    .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
            if !plain {
                return Err(format!("route file must be a relative name: {}", route.file));
            }
        }

        Ok(())
    }

    /// Busca el archivo para un path ya decodificado
    ///
    /// Recorre la tabla en orden y retorna el primer match exacto.
    pub fn resolve(&self, path: &str) -> Option<&str> {
        self.routes
            .iter()
            .find(|route| route.path == path)
            .map(|route| route.file.as_str())
    }

    /// Páginas de la tabla que no existen bajo `root`
    ///
    /// No es un error al arrancar: cada request a una de estas rutas falla
    /// por separado. Sirve para avisar en el log.
    pub fn missing_pages(&self, root: &Path) -> Vec<PathBuf> {
        self.routes
            .iter()
            .map(|route| root.join(&route.file))
            .filter(|page| !page.is_file())
            .collect()
    }

    /// Rutas en orden de lookup
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

impl Default for RouteTable {
    /// Las tres páginas del sitio
    fn default() -> Self {
        Self::new([
            ("/index", "index.html"),
            ("/path1", "path1.html"),
            ("/path2", "path2.html"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_routes() {
        let table = RouteTable::default();
        assert_eq!(table.resolve("/index"), Some("index.html"));
        assert_eq!(table.resolve("/path1"), Some("path1.html"));
        assert_eq!(table.resolve("/path2"), Some("path2.html"));
    }

    #[test]
    fn test_route_not_found() {
        let table = RouteTable::default();
        assert_eq!(table.resolve("/missing"), None);
        assert_eq!(table.resolve(""), None);
        assert_eq!(table.resolve("/"), None);
    }

    #[test]
    fn test_exact_match_only() {
        let table = RouteTable::default();
        assert_eq!(table.resolve("/Index"), None);
        assert_eq!(table.resolve("/index/"), None);
        assert_eq!(table.resolve("/index?x=1"), None);
        assert_eq!(table.resolve("index"), None);
    }

    #[test]
    fn test_first_match_wins() {
        let table = RouteTable::new([("/a", "first.html"), ("/a", "second.html")]);
        assert_eq!(table.resolve("/a"), Some("first.html"));
    }

    #[test]
    fn test_default_is_valid() {
        assert!(RouteTable::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_routes() {
        let cases = [
            RouteTable::new([("index", "index.html")]),
            RouteTable::new([("/x", "../secret.html")]),
            RouteTable::new([("/x", "/etc/passwd")]),
            RouteTable::new([("/x", "")]),
            RouteTable::new(Vec::<(String, String)>::new()),
        ];
        for table in cases {
            assert!(table.validate().is_err(), "should reject {:?}", table);
        }
    }

    #[test]
    fn test_validate_accepts_subdirectory() {
        let table = RouteTable::new([("/docs", "docs/intro.html")]);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_missing_pages() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "x").unwrap();

        let missing = RouteTable::default().missing_pages(dir.path());
        assert_eq!(
            missing,
            vec![dir.path().join("path1.html"), dir.path().join("path2.html")]
        );
    }

    #[test]
    fn test_from_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("routes.json");
        fs::write(
            &path,
            r#"{"routes": [{"path": "/home", "file": "home.html"}, {"path": "/about", "file": "about.html"}]}"#,
        )
        .unwrap();

        let table = RouteTable::from_json_file(&path).unwrap();
        assert_eq!(table.routes().len(), 2);
        assert_eq!(table.resolve("/home"), Some("home.html"));
        assert_eq!(table.resolve("/about"), Some("about.html"));
        assert_eq!(table.resolve("/index"), None);
    }

    #[test]
    fn test_from_json_file_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("routes.json");
        fs::write(&path, "{not json").unwrap();

        let result = RouteTable::from_json_file(&path);
        assert!(matches!(result, Err(ServerError::Routes { .. })));
    }

    #[test]
    fn test_from_json_file_invalid_route() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("routes.json");
        fs::write(&path, r#"{"routes": [{"path": "/x", "file": "../x.html"}]}"#).unwrap();

        let err = RouteTable::from_json_file(&path).unwrap_err();
        assert!(err.to_string().contains("relative name"));
    }

    #[test]
    fn test_from_json_file_missing() {
        let dir = TempDir::new().unwrap();
        let result = RouteTable::from_json_file(&dir.path().join("nope.json"));
        assert!(result.is_err());
    }
}
