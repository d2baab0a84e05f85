use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crudkit_core::{CoreError, CrudConfig};

use crate::error::CodegenError;
use crate::replacements::Replacements;

/// Substitute every placeholder in insertion order.
///
/// Placeholders left in the output are logged at debug level; stubs may
/// carry placeholders a given artifact does not fill.
pub fn render_template(
    template: &str,
    replacements: &Replacements,
) -> Result<String, CodegenError> {
    let mut result = template.to_string();

    for (placeholder, value) in replacements.iter() {
        result = result.replace(placeholder, value);
    }

    let leftover = regex::Regex::new(r"\{\{[A-Za-z][A-Za-z0-9]*\}\}")
        .map_err(|e| CodegenError::template(format!("Regex error: {}", e)))?;
    let unresolved: Vec<&str> = leftover.find_iter(&result).map(|m| m.as_str()).collect();
    if !unresolved.is_empty() {
        tracing::debug!("Unresolved placeholders: {}", unresolved.join(", "));
    }

    Ok(result)
}

/// Front-end flavour of the generated views.
///
/// Each stack reads its view stubs from `views/<stack>/<view>`. Built-in
/// stubs exist for the two Blade stacks; the others need a stub directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewStack {
    Heron,
    BladeBootstrap,
    BladeTailwind,
    VueBootstrap,
    VueTailwind,
}

impl ViewStack {
    pub const ALL: [ViewStack; 5] = [
        ViewStack::Heron,
        ViewStack::BladeBootstrap,
        ViewStack::BladeTailwind,
        ViewStack::VueBootstrap,
        ViewStack::VueTailwind,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ViewStack::Heron => "heron",
            ViewStack::BladeBootstrap => "blade-bootstrap",
            ViewStack::BladeTailwind => "blade-tailwind",
            ViewStack::VueBootstrap => "vue-bootstrap",
            ViewStack::VueTailwind => "vue-tailwind",
        }
    }

    /// Stub name of `view` for an optional stack; no stack means `views/<view>`
    pub fn view_stub(stack: Option<ViewStack>, view: &str) -> String {
        match stack {
            Some(stack) => format!("views/{}/{}", stack.name(), view),
            None => format!("views/{}", view),
        }
    }
}

impl fmt::Display for ViewStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViewStack {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        ViewStack::ALL
            .into_iter()
            .find(|stack| stack.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                let known: Vec<&str> = ViewStack::ALL.iter().map(|stack| stack.name()).collect();
                CoreError::validation(format!(
                    "Unknown view stack '{}', expected one of: {}",
                    name,
                    known.join(", ")
                ))
            })
    }
}

/// Resolves stub names (`Model`, `views/index`, `api/Controller`, ...) to stub text
#[derive(Debug, Clone)]
pub struct StubLoader {
    root: Option<PathBuf>,
}

impl StubLoader {
    /// Built-in stubs only
    pub fn builtin() -> Self {
        Self { root: None }
    }

    /// Stubs from a directory, as `<root>/<name>.stub`
    pub fn from_dir(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Built-in stubs for `stub_path: default`, otherwise the configured
    /// directory, relative paths taken from the project root
    pub fn from_config(config: &CrudConfig, project_root: &Path) -> Self {
        if config.uses_default_stubs() {
            Self::builtin()
        } else {
            Self::from_dir(project_root.join(&config.stub_path))
        }
    }

    pub fn load(&self, name: &str) -> Result<Cow<'static, str>, CodegenError> {
        match &self.root {
            None => builtin_stub(name)
                .map(Cow::Borrowed)
                .ok_or_else(|| CodegenError::template(format!("No built-in stub named '{}'", name))),
            Some(root) => {
                let path = root.join(format!("{}.stub", name));
                std::fs::read_to_string(&path).map(Cow::Owned).map_err(|e| {
                    CodegenError::template(format!("Cannot read stub {}: {}", path.display(), e))
                })
            }
        }
    }
}

fn builtin_stub(name: &str) -> Option<&'static str> {
    let stub = match name {
        "Model" => MODEL_STUB,
        "Controller" => CONTROLLER_STUB,
        "routes" => ROUTES_STUB,
        "views/index" | "views/blade-bootstrap/index" => INDEX_VIEW_STUB,
        "views/create" | "views/blade-bootstrap/create" => CREATE_VIEW_STUB,
        "views/edit" | "views/blade-bootstrap/edit" => EDIT_VIEW_STUB,
        "views/form" | "views/blade-bootstrap/form" => FORM_VIEW_STUB,
        "views/show" | "views/blade-bootstrap/show" => SHOW_VIEW_STUB,
        "views/blade-tailwind/index" => TAILWIND_INDEX_VIEW_STUB,
        "views/blade-tailwind/create" => TAILWIND_CREATE_VIEW_STUB,
        "views/blade-tailwind/edit" => TAILWIND_EDIT_VIEW_STUB,
        "views/blade-tailwind/form" => TAILWIND_FORM_VIEW_STUB,
        "views/blade-tailwind/show" => TAILWIND_SHOW_VIEW_STUB,
        "views/form-field" => FORM_FIELD_STUB,
        "views/view-field" => VIEW_FIELD_STUB,
        "api/Controller" => API_CONTROLLER_STUB,
        "api/Resource" => API_RESOURCE_STUB,
        "api/Request" => API_REQUEST_STUB,
        "api/routes" => API_ROUTES_STUB,
        "Service" => SERVICE_STUB,
        _ => return None,
    };
    Some(stub)
}

/// Opening lines of a route file created from scratch
pub static ROUTE_FILE_HEADER: &str = "<?php\n\nuse Illuminate\\Support\\Facades\\Route;\n";

pub static MODEL_STUB: &str = r#"<?php

namespace {{modelNamespace}};

use Illuminate\Database\Eloquent\Model;
{{softDeletesNamespace}}
/**
 * Class {{modelName}}
 *
 {{properties}}
 * @package {{modelNamespace}}
 * @mixin \Illuminate\Database\Eloquent\Builder
 */
class {{modelName}} extends Model
{
    {{softDeletes}}
    protected $table = '{{nameTable}}';

    static $rules = [{{rules}}
    ];

    protected $perPage = 20;

    /**
     * Attributes that should be mass-assignable.
     *
     * @var array
     */
    protected $fillable = [{{fillable}}
    ];
{{relations}}
}
"#;

pub static CONTROLLER_STUB: &str = r#"<?php

namespace {{controllerNamespace}};

use {{modelNamespace}}\{{modelName}};
use Illuminate\Http\Request;

/**
 * Class {{modelName}}Controller
 * @package {{controllerNamespace}}
 */
class {{modelName}}Controller extends Controller
{
    public function index()
    {
        ${{modelNamePluralLowerCase}} = {{modelName}}::paginate();

        return view('{{modelView}}.index', compact('{{modelNamePluralLowerCase}}'))
            ->with('i', (request()->input('page', 1) - 1) * ${{modelNamePluralLowerCase}}->perPage());
    }

    public function create()
    {
        ${{modelNameLowerCase}} = new {{modelName}}();

        return view('{{modelView}}.create', compact('{{modelNameLowerCase}}'));
    }

    public function store(Request $request)
    {
        request()->validate({{modelName}}::$rules);

        {{modelName}}::create($request->all());

        return redirect()->route('{{modelRoute}}.index')
            ->with('success', '{{modelTitle}} created successfully.');
    }

    public function show($id)
    {
        ${{modelNameLowerCase}} = {{modelName}}::find($id);

        return view('{{modelView}}.show', compact('{{modelNameLowerCase}}'));
    }

    public function edit($id)
    {
        ${{modelNameLowerCase}} = {{modelName}}::find($id);

        return view('{{modelView}}.edit', compact('{{modelNameLowerCase}}'));
    }

    public function update(Request $request, {{modelName}} ${{modelNameLowerCase}})
    {
        request()->validate({{modelName}}::$rules);

        ${{modelNameLowerCase}}->update($request->all());

        return redirect()->route('{{modelRoute}}.index')
            ->with('success', '{{modelTitle}} updated successfully');
    }

    public function destroy($id)
    {
        {{modelName}}::find($id)->delete();

        return redirect()->route('{{modelRoute}}.index')
            ->with('success', '{{modelTitle}} deleted successfully');
    }
}
"#;

pub static ROUTES_STUB: &str = r#"Route::resource('{{modelRoute}}', {{controllerNamespace}}\{{modelName}}Controller::class);
"#;

pub static INDEX_VIEW_STUB: &str = r#"@extends('{{layout}}')

@section('template_title')
    {{modelTitle}}
@endsection

@section('content')
    <div class="container-fluid">
        <div class="row">
            <div class="col-sm-12">
                <div class="card">
                    <div class="card-header">
                        <div style="display: flex; justify-content: space-between; align-items: center;">
                            <span id="card_title">{{ __('{{modelTitle}}') }}</span>
                            <div class="float-right">
                                <a href="{{ route('{{modelRoute}}.create') }}" class="btn btn-primary btn-sm float-right">
                                    {{ __('Create New') }}
                                </a>
                            </div>
                        </div>
                    </div>
                    @if ($message = Session::get('success'))
                        <div class="alert alert-success">
                            <p>{{ $message }}</p>
                        </div>
                    @endif

                    <div class="card-body">
                        <div class="table-responsive">
                            <table class="table table-striped table-hover">
                                <thead class="thead">
                                    <tr>
                                        <th>No</th>{{tableHeader}}
                                        <th></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    @foreach (${{modelNamePluralLowerCase}} as ${{modelNameLowerCase}})
                                        <tr>
                                            <td>{{ ++$i }}</td>{{tableBody}}
                                            <td>
                                                <form action="{{ route('{{modelRoute}}.destroy', ${{modelNameLowerCase}}->id) }}" method="POST">
                                                    <a class="btn btn-sm btn-primary" href="{{ route('{{modelRoute}}.show', ${{modelNameLowerCase}}->id) }}">{{ __('Show') }}</a>
                                                    <a class="btn btn-sm btn-success" href="{{ route('{{modelRoute}}.edit', ${{modelNameLowerCase}}->id) }}">{{ __('Edit') }}</a>
                                                    @csrf
                                                    @method('DELETE')
                                                    <button type="submit" class="btn btn-danger btn-sm">{{ __('Delete') }}</button>
                                                </form>
                                            </td>
                                        </tr>
                                    @endforeach
                                </tbody>
                            </table>
                        </div>
                    </div>
                </div>
                {!! ${{modelNamePluralLowerCase}}->links() !!}
            </div>
        </div>
    </div>
@endsection
"#;

pub static CREATE_VIEW_STUB: &str = r#"@extends('{{layout}}')

@section('template_title')
    {{ __('Create') }} {{modelTitle}}
@endsection

@section('content')
    <section class="content container-fluid">
        <div class="row">
            <div class="col-md-12">
                <div class="card card-default">
                    <div class="card-header">
                        <span class="card-title">{{ __('Create') }} {{modelTitle}}</span>
                    </div>
                    <div class="card-body">
                        <form method="POST" action="{{ route('{{modelRoute}}.store') }}" role="form" enctype="multipart/form-data">
                            @csrf

                            @include('{{modelView}}.form')

                        </form>
                    </div>
                </div>
            </div>
        </div>
    </section>
@endsection
"#;

pub static EDIT_VIEW_STUB: &str = r#"@extends('{{layout}}')

@section('template_title')
    {{ __('Update') }} {{modelTitle}}
@endsection

@section('content')
    <section class="content container-fluid">
        <div class="">
            <div class="col-md-12">
                <div class="card card-default">
                    <div class="card-header">
                        <span class="card-title">{{ __('Update') }} {{modelTitle}}</span>
                    </div>
                    <div class="card-body">
                        <form method="POST" action="{{ route('{{modelRoute}}.update', ${{modelNameLowerCase}}->id) }}" role="form" enctype="multipart/form-data">
                            {{ method_field('PATCH') }}
                            @csrf

                            @include('{{modelView}}.form')

                        </form>
                    </div>
                </div>
            </div>
        </div>
    </section>
@endsection
"#;

pub static FORM_VIEW_STUB: &str = r#"<div class="box box-info padding-1">
    <div class="box-body">
        {{form}}
    </div>
    <div class="box-footer mt20">
        <button type="submit" class="btn btn-primary">{{ __('Submit') }}</button>
    </div>
</div>
"#;

pub static SHOW_VIEW_STUB: &str = r#"@extends('{{layout}}')

@section('template_title')
    {{ ${{modelNameLowerCase}}->name ?? __('Show') . " " . __('{{modelTitle}}') }}
@endsection

@section('content')
    <section class="content container-fluid">
        <div class="row">
            <div class="col-md-12">
                <div class="card">
                    <div class="card-header">
                        <div class="float-left">
                            <span class="card-title">{{ __('Show') }} {{modelTitle}}</span>
                        </div>
                        <div class="float-right">
                            <a class="btn btn-primary" href="{{ route('{{modelRoute}}.index') }}"> {{ __('Back') }}</a>
                        </div>
                    </div>

                    <div class="card-body">
                        {{viewRows}}
                    </div>
                </div>
            </div>
        </div>
    </section>
@endsection
"#;

pub static TAILWIND_INDEX_VIEW_STUB: &str = r#"@extends('{{layout}}')

@section('template_title')
    {{modelTitle}}
@endsection

@section('content')
    <div class="py-12">
        <div class="max-w-full mx-auto sm:px-6 lg:px-8">
            <div class="flex items-center justify-between mb-4">
                <h1 class="text-base font-semibold text-gray-900">{{ __('{{modelTitle}}') }}</h1>
                <a href="{{ route('{{modelRoute}}.create') }}" class="rounded-md bg-indigo-600 px-3 py-2 text-sm font-semibold text-white hover:bg-indigo-500">
                    {{ __('Create New') }}
                </a>
            </div>
            @if ($message = Session::get('success'))
                <div class="mb-4 rounded-md bg-green-50 p-4 text-sm text-green-700">{{ $message }}</div>
            @endif

            <div class="overflow-x-auto bg-white shadow sm:rounded-lg">
                <table class="min-w-full divide-y divide-gray-300">
                    <thead class="bg-gray-50">
                        <tr class="text-left text-xs font-semibold uppercase tracking-wide text-gray-500">
                            <th>No</th>{{tableHeader}}
                            <th></th>
                        </tr>
                    </thead>
                    <tbody class="divide-y divide-gray-200 bg-white text-sm text-gray-700">
                        @foreach (${{modelNamePluralLowerCase}} as ${{modelNameLowerCase}})
                            <tr>
                                <td>{{ ++$i }}</td>{{tableBody}}
                                <td class="whitespace-nowrap text-right">
                                    <form action="{{ route('{{modelRoute}}.destroy', ${{modelNameLowerCase}}->id) }}" method="POST">
                                        <a href="{{ route('{{modelRoute}}.show', ${{modelNameLowerCase}}->id) }}" class="text-gray-600 hover:text-gray-900 mr-2">{{ __('Show') }}</a>
                                        <a href="{{ route('{{modelRoute}}.edit', ${{modelNameLowerCase}}->id) }}" class="text-indigo-600 hover:text-indigo-900 mr-2">{{ __('Edit') }}</a>
                                        @csrf
                                        @method('DELETE')
                                        <button type="submit" class="text-red-600 hover:text-red-900">{{ __('Delete') }}</button>
                                    </form>
                                </td>
                            </tr>
                        @endforeach
                    </tbody>
                </table>
            </div>
            <div class="mt-4">{!! ${{modelNamePluralLowerCase}}->links() !!}</div>
        </div>
    </div>
@endsection
"#;

pub static TAILWIND_CREATE_VIEW_STUB: &str = r#"@extends('{{layout}}')

@section('template_title')
    {{ __('Create') }} {{modelTitle}}
@endsection

@section('content')
    <div class="py-12">
        <div class="max-w-3xl mx-auto sm:px-6 lg:px-8">
            <div class="bg-white p-6 shadow sm:rounded-lg">
                <h1 class="mb-6 text-base font-semibold text-gray-900">{{ __('Create') }} {{modelTitle}}</h1>
                <form method="POST" action="{{ route('{{modelRoute}}.store') }}" role="form" enctype="multipart/form-data">
                    @csrf

                    @include('{{modelView}}.form')
                </form>
            </div>
        </div>
    </div>
@endsection
"#;

pub static TAILWIND_EDIT_VIEW_STUB: &str = r#"@extends('{{layout}}')

@section('template_title')
    {{ __('Update') }} {{modelTitle}}
@endsection

@section('content')
    <div class="py-12">
        <div class="max-w-3xl mx-auto sm:px-6 lg:px-8">
            <div class="bg-white p-6 shadow sm:rounded-lg">
                <h1 class="mb-6 text-base font-semibold text-gray-900">{{ __('Update') }} {{modelTitle}}</h1>
                <form method="POST" action="{{ route('{{modelRoute}}.update', ${{modelNameLowerCase}}->id) }}" role="form" enctype="multipart/form-data">
                    {{ method_field('PATCH') }}
                    @csrf

                    @include('{{modelView}}.form')
                </form>
            </div>
        </div>
    </div>
@endsection
"#;

pub static TAILWIND_FORM_VIEW_STUB: &str = r#"<div class="space-y-6">
    {{form}}
    <div class="flex justify-end">
        <button type="submit" class="rounded-md bg-indigo-600 px-3 py-2 text-sm font-semibold text-white hover:bg-indigo-500">{{ __('Submit') }}</button>
    </div>
</div>
"#;

pub static TAILWIND_SHOW_VIEW_STUB: &str = r#"@extends('{{layout}}')

@section('template_title')
    {{ ${{modelNameLowerCase}}->name ?? __('Show') . " " . __('{{modelTitle}}') }}
@endsection

@section('content')
    <div class="py-12">
        <div class="max-w-3xl mx-auto sm:px-6 lg:px-8">
            <div class="bg-white p-6 shadow sm:rounded-lg">
                <div class="flex items-center justify-between mb-6">
                    <h1 class="text-base font-semibold text-gray-900">{{ __('Show') }} {{modelTitle}}</h1>
                    <a href="{{ route('{{modelRoute}}.index') }}" class="text-sm text-indigo-600 hover:text-indigo-900">{{ __('Back') }}</a>
                </div>
                {{viewRows}}
            </div>
        </div>
    </div>
@endsection
"#;

pub static FORM_FIELD_STUB: &str = r#"
        <div class="form-group mb-2 mb20">
            <label for="{{column}}" class="form-label">{{ __('{{title}}') }}</label>
            <input type="text" name="{{column}}" class="form-control @error('{{column}}') is-invalid @enderror" value="{{ old('{{column}}', ${{modelNameLowerCase}}?->{{column}}) }}" id="{{column}}" placeholder="{{title}}">
            {!! $errors->first('{{column}}', '<div class="invalid-feedback" role="alert"><strong>:message</strong></div>') !!}
        </div>"#;

pub static VIEW_FIELD_STUB: &str = r#"
                        <div class="form-group mb-2 mb20">
                            <strong>{{title}}:</strong>
                            {{ ${{modelNameLowerCase}}->{{column}} }}
                        </div>"#;

pub static API_CONTROLLER_STUB: &str = r#"<?php

namespace App\Http\Controllers\Api;

use {{modelNamespace}}\{{modelName}};
use App\Http\Controllers\Controller;
use App\Http\Requests\{{modelName}}Request;
use App\Http\Resources\{{modelName}}Resource;
use Illuminate\Http\Resources\Json\AnonymousResourceCollection;
use Illuminate\Http\Response;

class {{modelName}}Controller extends Controller
{
    public function index(): AnonymousResourceCollection
    {
        ${{modelNamePluralLowerCase}} = {{modelName}}::paginate();

        return {{modelName}}Resource::collection(${{modelNamePluralLowerCase}});
    }

    public function store({{modelName}}Request $request): {{modelName}}Resource
    {
        return new {{modelName}}Resource({{modelName}}::create($request->validated()));
    }

    public function show({{modelName}} ${{modelNameLowerCase}}): {{modelName}}Resource
    {
        return new {{modelName}}Resource(${{modelNameLowerCase}});
    }

    public function update({{modelName}}Request $request, {{modelName}} ${{modelNameLowerCase}}): {{modelName}}Resource
    {
        ${{modelNameLowerCase}}->update($request->validated());

        return new {{modelName}}Resource(${{modelNameLowerCase}});
    }

    public function destroy({{modelName}} ${{modelNameLowerCase}}): Response
    {
        ${{modelNameLowerCase}}->delete();

        return response()->noContent();
    }
}
"#;

pub static API_RESOURCE_STUB: &str = r#"<?php

namespace App\Http\Resources;

use Illuminate\Http\Request;
use Illuminate\Http\Resources\Json\JsonResource;

class {{modelName}}Resource extends JsonResource
{
    /**
     * Transform the resource into an array.
     *
     * @return array<string, mixed>
     */
    public function toArray(Request $request): array
    {
        return parent::toArray($request);
    }
}
"#;

pub static API_REQUEST_STUB: &str = r#"<?php

namespace App\Http\Requests;

use Illuminate\Foundation\Http\FormRequest;

class {{modelName}}Request extends FormRequest
{
    public function authorize(): bool
    {
        return true;
    }

    /**
     * @return array<string, \Illuminate\Contracts\Validation\ValidationRule|array|string>
     */
    public function rules(): array
    {
        return [{{rules}}
        ];
    }
}
"#;

pub static API_ROUTES_STUB: &str = r#"Route::apiResource('{{modelRoute}}', App\Http\Controllers\Api\{{modelName}}Controller::class);
"#;

pub static SERVICE_STUB: &str = r#"<?php

namespace {{serviceNamespace}};

use {{modelNamespace}}\{{modelClass}};
use Illuminate\Contracts\Pagination\LengthAwarePaginator;

class {{serviceClass}}
{
    public function paginate(int $perPage = 20): LengthAwarePaginator
    {
        return {{modelClass}}::paginate($perPage);
    }

    public function find(int|string $id): ?{{modelClass}}
    {
        return {{modelClass}}::find($id);
    }

    public function create(array $data): {{modelClass}}
    {
        return {{modelClass}}::create($data);
    }

    public function update({{modelClass}} ${{modelNameLowerCase}}, array $data): {{modelClass}}
    {
        ${{modelNameLowerCase}}->update($data);

        return ${{modelNameLowerCase}};
    }

    public function delete({{modelClass}} ${{modelNameLowerCase}}): void
    {
        ${{modelNameLowerCase}}->delete();
    }
}
"#;
